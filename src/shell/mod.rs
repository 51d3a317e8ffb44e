// Composition root of the transactions service.
//
// Responsibilities
// - Pick the store and task channel adapters from configuration and enabled features.
// - Wire adapters into the use case handlers.
// - Serve HTTP and run the inbound task worker until shutdown.

pub mod config;
pub mod http;
pub mod state;
pub mod workers;

use crate::modules::transactions::adapters::outbound::transaction_store::TransactionStore;
use crate::modules::transactions::adapters::outbound::transaction_store_in_memory::InMemoryTransactionStore;
use crate::shared::core::primitives::SystemClock;
use crate::shared::infrastructure::task_channel::in_memory::InMemoryTaskChannel;
use crate::shared::infrastructure::task_channel::{
    TRANSACTION_QUEUE, TaskChannel, TaskRoutes, TaskSource,
};
use crate::shell::config::Config;
use crate::shell::state::AppState;
use crate::shell::workers::TaskWorker;
use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};

pub struct Backends {
    pub store: Arc<dyn TransactionStore>,
    pub channel: Arc<dyn TaskChannel>,
    pub source: Arc<dyn TaskSource>,
}

pub async fn connect_store(config: &Config) -> Result<Arc<dyn TransactionStore>> {
    match config.database_url.as_deref() {
        #[cfg(feature = "storage-postgres")]
        Some(url) => {
            use crate::modules::transactions::adapters::outbound::transaction_store_postgres::PostgresTransactionStore;
            let store = PostgresTransactionStore::connect(url)
                .await
                .context("Failed to open the Postgres transaction store")?;
            info!("Using Postgres transaction store");
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "storage-postgres"))]
        Some(_) => {
            warn!("DATABASE_URL is set but storage-postgres is not enabled, using memory");
            Ok(Arc::new(InMemoryTransactionStore::new()))
        }
        None => {
            info!("Using in-memory transaction store");
            Ok(Arc::new(InMemoryTransactionStore::new()))
        }
    }
}

pub async fn connect_channel(
    config: &Config,
) -> Result<(Arc<dyn TaskChannel>, Arc<dyn TaskSource>)> {
    match config.broker_url.as_deref() {
        #[cfg(feature = "channel-redis")]
        Some(url) => {
            use crate::shared::infrastructure::task_channel::celery_redis::CeleryRedisChannel;
            let origin = format!("transactions@{}", config.server_host);
            let channel = Arc::new(
                CeleryRedisChannel::connect(url, origin, config.worker_poll_interval)
                    .await
                    .context("Failed to connect to the Celery broker")?,
            );
            info!("Using Celery task channel over Redis");
            let source: Arc<dyn TaskSource> = channel.clone();
            let channel: Arc<dyn TaskChannel> = channel;
            Ok((channel, source))
        }
        #[cfg(not(feature = "channel-redis"))]
        Some(_) => {
            warn!("CELERY_BROKER_HOST is set but channel-redis is not enabled, using memory");
            Ok(in_memory_channel())
        }
        None => {
            info!("Using in-memory task channel");
            Ok(in_memory_channel())
        }
    }
}

/// Serves only this service's own queue; tasks for other services have no consumer here.
fn in_memory_channel() -> (Arc<dyn TaskChannel>, Arc<dyn TaskSource>) {
    let channel = Arc::new(InMemoryTaskChannel::local([TRANSACTION_QUEUE]));
    let source: Arc<dyn TaskSource> = channel.clone();
    (channel, source)
}

pub async fn connect(config: &Config) -> Result<Backends> {
    let store = connect_store(config).await?;
    let (channel, source) = connect_channel(config).await?;
    Ok(Backends {
        store,
        channel,
        source,
    })
}

pub async fn run(config: Config) -> Result<()> {
    let backends = connect(&config).await?;
    let state = AppState::new(
        backends.store,
        backends.channel,
        Arc::new(SystemClock),
        TaskRoutes::default(),
        &config.default_currency,
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let worker = TaskWorker::new(
        backends.source,
        state.create_handler.clone(),
        TRANSACTION_QUEUE,
        config.worker_poll_interval,
    );
    let worker = tokio::spawn(worker.run(shutdown_rx));

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    info!(%address, "Transactions service listening");

    axum::serve(listener, http::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    shutdown_tx.send(true).ok();
    worker.await.context("Task worker panicked")?;
    info!("Transactions service stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Ctrl-C received"),
        _ = terminate => info!("SIGTERM received"),
    }
    info!("Shutdown signal received");
}
