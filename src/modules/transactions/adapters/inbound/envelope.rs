// Response envelope shared by the HTTP surface and the inbound task worker.
//
// Success: {"success": true, "message"?, "transaction"?, "transactions"?}
// Failure: {"success": false, "error": CLASS, "message"}

use crate::modules::transactions::core::errors::{ErrorClass, TransactionError};
use crate::modules::transactions::core::transaction::Transaction;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

const INTERNAL_MESSAGE: &str = "Internal server error";
const DISPATCH_MESSAGE: &str =
    "Transaction status updated but the cart service could not be notified";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction: Option<Transaction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transactions: Option<Vec<Transaction>>,
}

impl Envelope {
    pub fn ok() -> Self {
        Self {
            success: true,
            ..Self::default()
        }
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn transaction(mut self, transaction: Transaction) -> Self {
        self.transaction = Some(transaction);
        self
    }

    pub fn transactions(mut self, transactions: Vec<Transaction>) -> Self {
        self.transactions = Some(transactions);
        self
    }

    pub fn failure(class: ErrorClass, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(class.code().to_string()),
            message: Some(message.into()),
            ..Self::default()
        }
    }

    /// Internal failures carry a generic message; the detail stays in the logs.
    /// A failed dispatch still reports the stored transaction in its new state.
    pub fn from_error(err: &TransactionError) -> Self {
        match err {
            TransactionError::Dispatch { transaction, .. } => {
                Self::failure(ErrorClass::Internal, DISPATCH_MESSAGE)
                    .transaction(transaction.as_ref().clone())
            }
            err => match err.class() {
                ErrorClass::Internal => Self::failure(ErrorClass::Internal, INTERNAL_MESSAGE),
                class => Self::failure(class, err.to_string()),
            },
        }
    }
}

pub fn status_for(class: ErrorClass) -> StatusCode {
    match class {
        ErrorClass::Validation | ErrorClass::InvalidCart => StatusCode::BAD_REQUEST,
        ErrorClass::NotFound => StatusCode::NOT_FOUND,
        ErrorClass::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for TransactionError {
    fn into_response(self) -> Response {
        (status_for(self.class()), Json(Envelope::from_error(&self))).into_response()
    }
}

#[cfg(test)]
mod envelope_tests {
    use super::*;
    use crate::modules::transactions::adapters::outbound::transaction_store::StoreError;
    use crate::modules::transactions::core::errors::NotFoundReason;
    use crate::modules::transactions::core::transaction::TransactionId;
    use crate::shared::infrastructure::task_channel::TaskChannelError;
    use crate::tests::fixtures::commands::create_transaction::CreateTransactionBuilder;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(ErrorClass::Validation, StatusCode::BAD_REQUEST)]
    #[case(ErrorClass::NotFound, StatusCode::NOT_FOUND)]
    #[case(ErrorClass::InvalidCart, StatusCode::BAD_REQUEST)]
    #[case(ErrorClass::Internal, StatusCode::INTERNAL_SERVER_ERROR)]
    fn it_should_map_each_class_to_a_status(#[case] class: ErrorClass, #[case] status: StatusCode) {
        assert_eq!(status_for(class), status);
    }

    #[rstest]
    fn it_should_omit_empty_fields() {
        let value = serde_json::to_value(Envelope::ok().message("done")).unwrap();
        assert_eq!(value, json!({ "success": true, "message": "done" }));
    }

    #[rstest]
    fn it_should_describe_a_not_found_failure() {
        let err = TransactionError::NotFound(NotFoundReason::Missing);
        let value = serde_json::to_value(Envelope::from_error(&err)).unwrap();
        assert_eq!(
            value,
            json!({
                "success": false,
                "error": "NOT_FOUND",
                "message": "Transaction not found"
            })
        );
    }

    #[rstest]
    fn it_should_hide_internal_details() {
        let err = TransactionError::Store(StoreError::Backend("connection refused".into()));
        let envelope = Envelope::from_error(&err);
        assert_eq!(envelope.error.as_deref(), Some("INTERNAL_ERROR"));
        assert_eq!(envelope.message.as_deref(), Some("Internal server error"));
        assert_eq!(envelope.transaction, None);
    }

    #[rstest]
    fn it_should_report_the_stored_transaction_when_dispatch_fails() {
        let transaction = CreateTransactionBuilder::new()
            .build_new()
            .into_transaction(TransactionId::generate());
        let err = TransactionError::Dispatch {
            transaction: Box::new(transaction.clone()),
            source: TaskChannelError::Backend("broker down".into()),
        };

        let envelope = Envelope::from_error(&err);

        assert!(!envelope.success);
        assert_eq!(envelope.error.as_deref(), Some("INTERNAL_ERROR"));
        assert_eq!(
            envelope.message.as_deref(),
            Some("Transaction status updated but the cart service could not be notified")
        );
        assert_eq!(envelope.transaction, Some(transaction));
        assert_eq!(status_for(err.class()), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
