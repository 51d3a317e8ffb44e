use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};

use crate::modules::transactions::adapters::inbound::envelope::Envelope;
use crate::shell::state::AppState;

pub async fn handle(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
) -> impl IntoResponse {
    match state.delete_handler.handle(&transaction_id).await {
        Ok(_) => Json(Envelope::ok().message("Transaction deleted successfully")).into_response(),
        Err(err) => err.into_response(),
    }
}
