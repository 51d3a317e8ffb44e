use crate::modules::transactions::adapters::outbound::transaction_store::TransactionStore;
use crate::modules::transactions::use_cases::create_transaction::handler::CreateTransactionHandler;
use crate::modules::transactions::use_cases::delete_transaction::handler::DeleteTransactionHandler;
use crate::modules::transactions::use_cases::query_transactions::handler::TransactionQueriesHandler;
use crate::modules::transactions::use_cases::update_transaction_status::handler::UpdateTransactionStatusHandler;
use crate::shared::core::primitives::Clock;
use crate::shared::infrastructure::task_channel::{TaskChannel, TaskRoutes};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub create_handler: Arc<CreateTransactionHandler<dyn TransactionStore>>,
    pub queries: Arc<TransactionQueriesHandler<dyn TransactionStore>>,
    pub delete_handler: Arc<DeleteTransactionHandler<dyn TransactionStore>>,
    pub update_status_handler:
        Arc<UpdateTransactionStatusHandler<dyn TransactionStore, dyn TaskChannel>>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn TransactionStore>,
        channel: Arc<dyn TaskChannel>,
        clock: Arc<dyn Clock>,
        routes: TaskRoutes,
        default_currency: &str,
    ) -> Self {
        Self {
            create_handler: Arc::new(CreateTransactionHandler::new(
                store.clone(),
                clock.clone(),
                default_currency,
            )),
            queries: Arc::new(TransactionQueriesHandler::new(store.clone())),
            delete_handler: Arc::new(DeleteTransactionHandler::new(store.clone())),
            update_status_handler: Arc::new(UpdateTransactionStatusHandler::new(
                store, channel, routes, clock,
            )),
        }
    }
}
