use anyhow::{Context, Result, bail};
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub log_level: String,
    pub default_currency: String,
    pub worker_poll_interval: Duration,
    pub database_url: Option<String>,
    pub broker_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if present
        let vars: HashMap<String, String> = std::env::vars().collect();
        Self::from_lookup(|key| vars.get(key).cloned())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };
        let optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let server_port = var("SERVER_PORT", "5000")
            .parse()
            .context("SERVER_PORT must be a port number")?;
        let poll_ms: u64 = var("WORKER_POLL_INTERVAL_MS", "500")
            .parse()
            .context("WORKER_POLL_INTERVAL_MS must be a number of milliseconds")?;
        // Zero would make the Redis consumer block forever and the worker never see shutdown.
        if poll_ms == 0 {
            bail!("WORKER_POLL_INTERVAL_MS must be greater than zero");
        }
        let broker_url = match optional("CELERY_BROKER_HOST") {
            Some(host) => {
                let port: u16 = var("CELERY_BROKER_PORT", "6379")
                    .parse()
                    .context("CELERY_BROKER_PORT must be a port number")?;
                Some(format!("redis://{host}:{port}/0"))
            }
            None => None,
        };

        Ok(Config {
            server_host: var("SERVER_HOST", "0.0.0.0"),
            server_port,
            log_level: var("LOG_LEVEL", "info").to_lowercase(),
            default_currency: var("DEFAULT_CURRENCY", "dollar"),
            worker_poll_interval: Duration::from_millis(poll_ms),
            database_url: optional("DATABASE_URL"),
            broker_url,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
