use crate::modules::transactions::adapters::outbound::transaction_store::TransactionStore;
use crate::modules::transactions::core::errors::TransactionError;
use crate::modules::transactions::core::transaction::Transaction;
use crate::modules::transactions::use_cases::create_transaction::command::CreateTransaction;
use crate::modules::transactions::use_cases::create_transaction::decide::decide_create;
use crate::modules::transactions::use_cases::create_transaction::decision::Decision;
use crate::shared::core::primitives::Clock;
use std::sync::Arc;
use tracing::{error, info, warn};

pub struct CreateTransactionHandler<TStore>
where
    TStore: TransactionStore + ?Sized,
{
    store: Arc<TStore>,
    clock: Arc<dyn Clock>,
    default_currency: String,
}

impl<TStore> CreateTransactionHandler<TStore>
where
    TStore: TransactionStore + ?Sized,
{
    pub fn new(
        store: Arc<TStore>,
        clock: Arc<dyn Clock>,
        default_currency: impl Into<String>,
    ) -> Self {
        Self {
            store,
            clock,
            default_currency: default_currency.into(),
        }
    }

    pub async fn handle(&self, command: CreateTransaction) -> Result<Transaction, TransactionError> {
        let cart_id = command.cart_id.clone();
        let new_transaction =
            match decide_create(command, &self.default_currency, self.clock.now_millis()) {
                Decision::Accepted { transaction } => transaction,
                Decision::Rejected { reason } => {
                    warn!(cart_id = %cart_id, %reason, "Transaction rejected");
                    return Err(TransactionError::Validation(reason.to_string()));
                }
            };

        let transaction = self
            .store
            .insert(new_transaction)
            .await
            .inspect_err(|e| error!(cart_id = %cart_id, error = %e, "Failed to store transaction"))?;

        info!(
            transaction_id = %transaction.id,
            cart_id = %transaction.cart_id,
            value = %transaction.transaction_value,
            currency = %transaction.currency,
            "Transaction created"
        );
        Ok(transaction)
    }
}
