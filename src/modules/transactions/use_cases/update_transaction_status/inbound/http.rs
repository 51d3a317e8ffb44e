use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;

use crate::modules::transactions::adapters::inbound::envelope::Envelope;
use crate::modules::transactions::core::errors::ErrorClass;
use crate::modules::transactions::use_cases::update_transaction_status::command::UpdateTransactionStatus;
use crate::shell::state::AppState;

#[derive(Deserialize)]
pub struct UpdateTransactionStatusBody {
    pub status: Option<String>,
    pub cart_id: Option<String>,
}

pub async fn handle(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
    body: Result<Json<UpdateTransactionStatusBody>, JsonRejection>,
) -> impl IntoResponse {
    let Json(body) = match body {
        Ok(b) => b,
        Err(_) => return StatusCode::UNPROCESSABLE_ENTITY.into_response(),
    };

    let Some(status) = body.status else {
        return (
            StatusCode::BAD_REQUEST,
            Json(Envelope::failure(ErrorClass::Validation, "status is required")),
        )
            .into_response();
    };

    let command = UpdateTransactionStatus {
        transaction_id,
        status,
        cart_id: body.cart_id,
    };

    match state.update_status_handler.handle(command).await {
        Ok(changed) => Json(
            Envelope::ok()
                .message(format!(
                    "Transaction status updated from '{}' to '{}'",
                    changed.previous, changed.current
                ))
                .transaction(changed.transaction),
        )
        .into_response(),
        Err(err) => err.into_response(),
    }
}
