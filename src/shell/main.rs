use anyhow::Result;
use tracing_subscriber::EnvFilter;
use transactions::shell::{self, config::Config};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    shell::run(config).await
}
