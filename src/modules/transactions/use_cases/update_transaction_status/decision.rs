use crate::modules::transactions::adapters::outbound::transaction_store::{
    StatusFilter, StatusUpdate,
};
use crate::modules::transactions::core::transitions::Transition;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecideError {
    #[error("Invalid transaction ID format")]
    InvalidId,

    #[error("Invalid status. Must be one of: pending, completed, failed, refunded")]
    UnknownStatus,

    #[error("A transaction cannot be moved back to pending")]
    InitialTarget,

    #[error("cart_id is required for status updates")]
    MissingCartId,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Decision {
    Accepted {
        transition: Transition,
        filter: StatusFilter,
        update: StatusUpdate,
    },
    Rejected {
        reason: DecideError,
    },
}
