use crate::modules::transactions::core::status::TransactionStatus;
use crate::shared::core::primitives::EpochMillis;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

pub const DEFAULT_CURRENCY: &str = "dollar";

/// Store-assigned identifier of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(Uuid);

impl TransactionId {
    pub fn generate() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for TransactionId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid transaction ID format")]
pub struct InvalidTransactionId(pub String);

impl FromStr for TransactionId {
    type Err = InvalidTransactionId;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Uuid::try_parse(value)
            .map(Self)
            .map_err(|_| InvalidTransactionId(value.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub cart_id: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub transaction_value: Decimal,
    pub currency: String,
    pub status: TransactionStatus,
    pub created_at: EpochMillis,
    pub updated_at: EpochMillis,
}

/// A validated transaction that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    pub cart_id: String,
    pub transaction_value: Decimal,
    pub currency: String,
    pub created_at: EpochMillis,
}

impl NewTransaction {
    pub fn into_transaction(self, id: TransactionId) -> Transaction {
        Transaction {
            id,
            cart_id: self.cart_id,
            transaction_value: self.transaction_value,
            currency: self.currency,
            status: TransactionStatus::Pending,
            created_at: self.created_at,
            updated_at: self.created_at,
        }
    }
}
