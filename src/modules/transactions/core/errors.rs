use crate::modules::transactions::adapters::outbound::transaction_store::StoreError;
use crate::modules::transactions::core::status::TransactionStatus;
use crate::modules::transactions::core::transaction::Transaction;
use crate::shared::infrastructure::task_channel::TaskChannelError;
use std::fmt;
use thiserror::Error;

/// Stable failure class reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Validation,
    NotFound,
    InvalidCart,
    Internal,
}

impl ErrorClass {
    pub fn code(&self) -> &'static str {
        match self {
            ErrorClass::Validation => "VALIDATION_ERROR",
            ErrorClass::NotFound => "NOT_FOUND",
            ErrorClass::InvalidCart => "INVALID_CART",
            ErrorClass::Internal => "INTERNAL_ERROR",
        }
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Why a transaction could not be found in the required shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundReason {
    Missing,
    CartMismatch,
    StatusMismatch {
        current: TransactionStatus,
        required: TransactionStatus,
    },
}

impl fmt::Display for NotFoundReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotFoundReason::Missing => f.write_str("Transaction not found"),
            NotFoundReason::CartMismatch => {
                f.write_str("Transaction not found for the given cart")
            }
            NotFoundReason::StatusMismatch { current, required } => write!(
                f,
                "Transaction not found with status {required} (current status is {current})"
            ),
        }
    }
}

#[derive(Debug, Error)]
pub enum TransactionError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(NotFoundReason),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// The status change was stored but the downstream task was not sent.
    #[error("transaction {id} updated but dispatch failed: {source}", id = .transaction.id)]
    Dispatch {
        transaction: Box<Transaction>,
        source: TaskChannelError,
    },
}

impl TransactionError {
    pub fn class(&self) -> ErrorClass {
        match self {
            TransactionError::Validation(_) => ErrorClass::Validation,
            TransactionError::NotFound(_) => ErrorClass::NotFound,
            TransactionError::Store(_) | TransactionError::Dispatch { .. } => ErrorClass::Internal,
        }
    }
}
