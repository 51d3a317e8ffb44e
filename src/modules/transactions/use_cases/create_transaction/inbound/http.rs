use axum::{
    Json, extract::State, extract::rejection::JsonRejection, http::StatusCode,
    response::IntoResponse,
};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::modules::transactions::adapters::inbound::envelope::Envelope;
use crate::modules::transactions::core::errors::ErrorClass;
use crate::modules::transactions::use_cases::create_transaction::command::CreateTransaction;
use crate::shell::state::AppState;

#[derive(Deserialize)]
pub struct CreateTransactionBody {
    pub cart_id: Option<String>,
    pub transaction_value: Option<Decimal>,
    pub currency: Option<String>,
}

pub async fn handle(
    State(state): State<AppState>,
    body: Result<Json<CreateTransactionBody>, JsonRejection>,
) -> impl IntoResponse {
    let Json(body) = match body {
        Ok(b) => b,
        Err(_) => return StatusCode::UNPROCESSABLE_ENTITY.into_response(),
    };

    let (Some(cart_id), Some(transaction_value)) = (body.cart_id, body.transaction_value) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(Envelope::failure(
                ErrorClass::Validation,
                "cart_id and transaction_value are required",
            )),
        )
            .into_response();
    };

    let command = CreateTransaction {
        cart_id,
        transaction_value,
        currency: body.currency,
    };

    match state.create_handler.handle(command).await {
        Ok(transaction) => (
            StatusCode::CREATED,
            Json(
                Envelope::ok()
                    .message(format!(
                        "Transaction created successfully for cart: {}",
                        transaction.cart_id
                    ))
                    .transaction(transaction),
            ),
        )
            .into_response(),
        Err(err) => err.into_response(),
    }
}
