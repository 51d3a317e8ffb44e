use crate::modules::transactions::adapters::outbound::transaction_store::TransactionStore;
use crate::modules::transactions::core::errors::{NotFoundReason, TransactionError};
use crate::modules::transactions::core::transaction::{Transaction, TransactionId};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Read side of the repository. Never dispatches.
pub struct TransactionQueriesHandler<TStore>
where
    TStore: TransactionStore + ?Sized,
{
    store: Arc<TStore>,
}

impl<TStore> TransactionQueriesHandler<TStore>
where
    TStore: TransactionStore + ?Sized,
{
    pub fn new(store: Arc<TStore>) -> Self {
        Self { store }
    }

    pub async fn get(&self, transaction_id: &str) -> Result<Transaction, TransactionError> {
        let id = parse_id(transaction_id)?;
        self.store
            .find_by_id(id)
            .await
            .inspect_err(|e| error!(transaction_id, error = %e, "Failed to fetch transaction"))?
            .ok_or(TransactionError::NotFound(NotFoundReason::Missing))
    }

    pub async fn list_all(&self) -> Result<Vec<Transaction>, TransactionError> {
        let transactions = self
            .store
            .find_all()
            .await
            .inspect_err(|e| error!(error = %e, "Failed to list transactions"))?;
        debug!(count = transactions.len(), "Retrieved all transactions");
        Ok(transactions)
    }

    pub async fn list_by_cart(&self, cart_id: &str) -> Result<Vec<Transaction>, TransactionError> {
        let transactions = self
            .store
            .find_by_cart(cart_id)
            .await
            .inspect_err(|e| error!(cart_id, error = %e, "Failed to list cart transactions"))?;
        debug!(cart_id, count = transactions.len(), "Retrieved cart transactions");
        Ok(transactions)
    }
}

pub(crate) fn parse_id(transaction_id: &str) -> Result<TransactionId, TransactionError> {
    transaction_id.parse::<TransactionId>().map_err(|e| {
        warn!(transaction_id, "Invalid transaction ID format");
        TransactionError::Validation(e.to_string())
    })
}
