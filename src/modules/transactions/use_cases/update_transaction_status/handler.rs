use crate::modules::transactions::adapters::outbound::task_dispatch::dispatch_transition;
use crate::modules::transactions::adapters::outbound::transaction_store::{
    StatusFilter, TransactionStore,
};
use crate::modules::transactions::core::errors::{NotFoundReason, TransactionError};
use crate::modules::transactions::core::status::TransactionStatus;
use crate::modules::transactions::core::transaction::Transaction;
use crate::modules::transactions::use_cases::update_transaction_status::command::UpdateTransactionStatus;
use crate::modules::transactions::use_cases::update_transaction_status::decide::decide_update_status;
use crate::modules::transactions::use_cases::update_transaction_status::decision::Decision;
use crate::shared::core::primitives::Clock;
use crate::shared::infrastructure::task_channel::{TaskChannel, TaskRoutes};
use std::sync::Arc;
use tracing::{error, info, warn};

/// A status change that was stored and announced downstream.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusChanged {
    pub previous: TransactionStatus,
    pub current: TransactionStatus,
    pub transaction: Transaction,
}

pub struct UpdateTransactionStatusHandler<TStore, TChannel>
where
    TStore: TransactionStore + ?Sized,
    TChannel: TaskChannel + ?Sized,
{
    store: Arc<TStore>,
    channel: Arc<TChannel>,
    routes: TaskRoutes,
    clock: Arc<dyn Clock>,
}

impl<TStore, TChannel> UpdateTransactionStatusHandler<TStore, TChannel>
where
    TStore: TransactionStore + ?Sized,
    TChannel: TaskChannel + ?Sized,
{
    pub fn new(
        store: Arc<TStore>,
        channel: Arc<TChannel>,
        routes: TaskRoutes,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            channel,
            routes,
            clock,
        }
    }

    pub async fn handle(
        &self,
        command: UpdateTransactionStatus,
    ) -> Result<StatusChanged, TransactionError> {
        let transaction_id = command.transaction_id.clone();
        let (transition, filter, update) =
            match decide_update_status(command, self.clock.now_millis()) {
                Decision::Accepted {
                    transition,
                    filter,
                    update,
                } => (transition, filter, update),
                Decision::Rejected { reason } => {
                    warn!(transaction_id = %transaction_id, %reason, "Status update rejected");
                    return Err(TransactionError::Validation(reason.to_string()));
                }
            };

        let updated = self
            .store
            .find_one_and_update(&filter, update)
            .await
            .inspect_err(|e| {
                error!(transaction_id = %filter.id, error = %e, "Status update failed in store")
            })?;

        let Some(transaction) = updated else {
            let reason = self.diagnose_miss(&filter).await;
            warn!(
                transaction_id = %filter.id,
                cart_id = %filter.cart_id,
                target = %update.status,
                %reason,
                "Status update matched no transaction"
            );
            return Err(TransactionError::NotFound(reason));
        };

        info!(
            transaction_id = %transaction.id,
            cart_id = %transaction.cart_id,
            old_status = %transition.from,
            new_status = %transition.to,
            "Transaction status updated"
        );

        if let Err(source) =
            dispatch_transition(&*self.channel, &self.routes, &transition, &transaction.cart_id)
                .await
        {
            error!(
                transaction_id = %transaction.id,
                task = transition.task.task_name(),
                error = %source,
                "Status updated but cart task dispatch failed"
            );
            return Err(TransactionError::Dispatch {
                transaction: Box::new(transaction),
                source,
            });
        }

        Ok(StatusChanged {
            previous: transition.from,
            current: transition.to,
            transaction,
        })
    }

    /// Read-only lookup explaining why a conditional update matched nothing.
    /// The miss stays a not-found even when the lookup itself fails.
    async fn diagnose_miss(&self, filter: &StatusFilter) -> NotFoundReason {
        match self.store.find_by_id(filter.id).await {
            Ok(None) => NotFoundReason::Missing,
            Ok(Some(current)) if current.cart_id != filter.cart_id => NotFoundReason::CartMismatch,
            Ok(Some(current)) => NotFoundReason::StatusMismatch {
                current: current.status,
                required: filter.status,
            },
            Err(e) => {
                error!(transaction_id = %filter.id, error = %e, "Lookup after status update miss failed");
                NotFoundReason::Missing
            }
        }
    }
}
