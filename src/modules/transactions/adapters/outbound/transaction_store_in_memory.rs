// In memory implementation of the TransactionStore port.
//
// Purpose
// - Support handler tests and local runs without a database.
//
// Responsibilities
// - Keep records ordered by id, which is time ordered.
// - Match and write inside one write section so a conditional update is atomic.

use crate::modules::transactions::adapters::outbound::transaction_store::{
    StatusFilter, StatusUpdate, StoreError, TransactionStore,
};
use crate::modules::transactions::core::transaction::{
    NewTransaction, Transaction, TransactionId,
};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemoryTransactionStore {
    records: RwLock<BTreeMap<TransactionId, Transaction>>,
    is_offline: bool,
    delay_update_ms: AtomicU64,
}

impl InMemoryTransactionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_offline(&mut self) {
        self.is_offline = !self.is_offline;
    }

    /// Delays every conditional update before it takes the write section.
    pub fn set_delay_update_ms(&self, ms: u64) {
        self.delay_update_ms.store(ms, Ordering::Relaxed);
    }

    fn ensure_online(&self) -> Result<(), StoreError> {
        if self.is_offline {
            return Err(StoreError::Backend("Transaction store offline".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl TransactionStore for InMemoryTransactionStore {
    async fn insert(&self, transaction: NewTransaction) -> Result<Transaction, StoreError> {
        self.ensure_online()?;
        let record = transaction.into_transaction(TransactionId::generate());
        self.records.write().await.insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: TransactionId) -> Result<Option<Transaction>, StoreError> {
        self.ensure_online()?;
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Transaction>, StoreError> {
        self.ensure_online()?;
        Ok(self.records.read().await.values().cloned().collect())
    }

    async fn find_by_cart(&self, cart_id: &str) -> Result<Vec<Transaction>, StoreError> {
        self.ensure_online()?;
        Ok(self
            .records
            .read()
            .await
            .values()
            .filter(|t| t.cart_id == cart_id)
            .cloned()
            .collect())
    }

    async fn delete_by_id(&self, id: TransactionId) -> Result<Option<Transaction>, StoreError> {
        self.ensure_online()?;
        Ok(self.records.write().await.remove(&id))
    }

    async fn find_one_and_update(
        &self,
        filter: &StatusFilter,
        update: StatusUpdate,
    ) -> Result<Option<Transaction>, StoreError> {
        self.ensure_online()?;

        let delay = self.delay_update_ms.load(Ordering::Relaxed);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        let mut records = self.records.write().await;
        match records.get_mut(&filter.id) {
            Some(record) if filter.matches(record) => {
                record.status = update.status;
                record.updated_at = update.updated_at;
                Ok(Some(record.clone()))
            }
            _ => Ok(None),
        }
    }
}
