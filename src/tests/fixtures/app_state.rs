use crate::modules::transactions::adapters::outbound::transaction_store_in_memory::InMemoryTransactionStore;
use crate::modules::transactions::core::transaction::DEFAULT_CURRENCY;
use crate::shared::core::primitives::FixedClock;
use crate::shared::infrastructure::task_channel::TaskRoutes;
use crate::shared::infrastructure::task_channel::in_memory::InMemoryTaskChannel;
use crate::shell::state::AppState;
use std::sync::Arc;

pub const FIXED_NOW: i64 = 1_700_000_000_000;

pub struct TestApp {
    pub state: AppState,
    pub store: Arc<InMemoryTransactionStore>,
    pub channel: Arc<InMemoryTaskChannel>,
    pub clock: Arc<FixedClock>,
}

pub fn make_test_app() -> TestApp {
    make_test_app_with(InMemoryTransactionStore::new(), InMemoryTaskChannel::new())
}

pub fn make_offline_store_app() -> TestApp {
    let mut store = InMemoryTransactionStore::new();
    store.toggle_offline();
    make_test_app_with(store, InMemoryTaskChannel::new())
}

pub fn make_test_app_with(store: InMemoryTransactionStore, channel: InMemoryTaskChannel) -> TestApp {
    let store = Arc::new(store);
    let channel = Arc::new(channel);
    let clock = Arc::new(FixedClock::new(FIXED_NOW));
    let state = AppState::new(
        store.clone(),
        channel.clone(),
        clock.clone(),
        TaskRoutes::default(),
        DEFAULT_CURRENCY,
    );
    TestApp {
        state,
        store,
        channel,
        clock,
    }
}
