// Record store port for transactions.
//
// Responsibilities
// - Hold one record per transaction.
// - Apply a status change only when the record still matches the given filter, in one atomic operation.
//
// Boundaries
// - No business rules here. Callers decide which filter and update to apply.

use crate::modules::transactions::core::status::TransactionStatus;
use crate::modules::transactions::core::transaction::{
    NewTransaction, Transaction, TransactionId,
};
use crate::shared::core::primitives::EpochMillis;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("stored record is corrupt: {0}")]
    Corrupt(String),

    #[error("backend error: {0}")]
    Backend(String),
}

/// Match predicate of a conditional status update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusFilter {
    pub id: TransactionId,
    pub cart_id: String,
    pub status: TransactionStatus,
}

impl StatusFilter {
    pub fn matches(&self, transaction: &Transaction) -> bool {
        transaction.id == self.id
            && transaction.cart_id == self.cart_id
            && transaction.status == self.status
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusUpdate {
    pub status: TransactionStatus,
    pub updated_at: EpochMillis,
}

#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Stores a new record under a freshly assigned id.
    async fn insert(&self, transaction: NewTransaction) -> Result<Transaction, StoreError>;

    async fn find_by_id(&self, id: TransactionId) -> Result<Option<Transaction>, StoreError>;

    /// All records, oldest first.
    async fn find_all(&self) -> Result<Vec<Transaction>, StoreError>;

    /// Records of one cart, oldest first.
    async fn find_by_cart(&self, cart_id: &str) -> Result<Vec<Transaction>, StoreError>;

    /// Removes the record and returns it, or `None` when it was absent.
    async fn delete_by_id(&self, id: TransactionId) -> Result<Option<Transaction>, StoreError>;

    /// Applies `update` to the record matching `filter` and returns the updated record.
    /// Returns `None` when no record matches at execution time.
    async fn find_one_and_update(
        &self,
        filter: &StatusFilter,
        update: StatusUpdate,
    ) -> Result<Option<Transaction>, StoreError>;
}
