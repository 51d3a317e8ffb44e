use crate::modules::transactions::core::transaction::NewTransaction;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecideError {
    #[error("Cart ID is required")]
    MissingCartId,

    #[error("Transaction value cannot be negative")]
    NegativeValue,

    #[error("Currency cannot be empty")]
    EmptyCurrency,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Decision {
    Accepted { transaction: NewTransaction },
    Rejected { reason: DecideError },
}
