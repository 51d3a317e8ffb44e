use crate::modules::transactions::adapters::outbound::transaction_store::TransactionStore;
use crate::modules::transactions::core::errors::{NotFoundReason, TransactionError};
use crate::modules::transactions::core::transaction::Transaction;
use crate::modules::transactions::use_cases::query_transactions::handler::parse_id;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Removes a transaction. No downstream task is sent and nothing cascades.
pub struct DeleteTransactionHandler<TStore>
where
    TStore: TransactionStore + ?Sized,
{
    store: Arc<TStore>,
}

impl<TStore> DeleteTransactionHandler<TStore>
where
    TStore: TransactionStore + ?Sized,
{
    pub fn new(store: Arc<TStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, transaction_id: &str) -> Result<Transaction, TransactionError> {
        let id = parse_id(transaction_id)?;
        let Some(deleted) = self
            .store
            .delete_by_id(id)
            .await
            .inspect_err(|e| error!(transaction_id, error = %e, "Failed to delete transaction"))?
        else {
            warn!(transaction_id, "Transaction to delete not found");
            return Err(TransactionError::NotFound(NotFoundReason::Missing));
        };

        info!(
            transaction_id = %deleted.id,
            cart_id = %deleted.cart_id,
            status = %deleted.status,
            "Transaction deleted"
        );
        Ok(deleted)
    }
}
