use std::str::FromStr;

use sysmgr_core::validation::{NamingPolicy, DEFAULT_MAX_NAMESPACE_LEN, DEFAULT_MAX_NAME_LEN};
use sysmgr_events::dispatcher::{DEFAULT_NOTIFY_TIMEOUT, DEFAULT_QUEUE_CAPACITY};

/// Which store implementation backs the lifecycle manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    /// Process-local stores; state is lost on restart.
    Memory,
}

impl StoreBackend {
    pub fn as_str(self) -> &'static str {
        match self {
            StoreBackend::Postgres => "postgres",
            StoreBackend::Memory => "memory",
        }
    }
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(format!("unknown store backend '{other}'")),
        }
    }
}

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `10000`).
    pub port: u16,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    pub store_backend: StoreBackend,
    /// Required when `store_backend` is [`StoreBackend::Postgres`].
    pub database_url: Option<String>,
    /// Name and namespace limits applied to new microservices.
    pub naming: NamingPolicy,
    /// Base URL of the deployment subsystem.
    pub notifier_url: String,
    /// Per-notification timeout in seconds (default: `10`).
    pub notifier_timeout_secs: u64,
    /// Deployment notifications that may be queued before new ones are dropped.
    pub queue_capacity: usize,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default                  |
    /// |-----------------------------|--------------------------|
    /// | `HOST`                      | `0.0.0.0`                |
    /// | `PORT`                      | `10000`                  |
    /// | `REQUEST_TIMEOUT_SECS`      | `30`                     |
    /// | `STORE_BACKEND`             | `postgres`               |
    /// | `DATABASE_URL`              | none                     |
    /// | `MAX_SERVICE_NAME_LEN`      | `10`                     |
    /// | `MAX_SERVICE_NAMESPACE_LEN` | `10`                     |
    /// | `DEPLOYMENT_NOTIFIER_URL`   | `http://localhost:10004` |
    /// | `NOTIFIER_TIMEOUT_SECS`     | `10`                     |
    /// | `DEPLOYMENT_QUEUE_CAPACITY` | `1024`                   |
    ///
    /// Panics on malformed values so misconfiguration fails at startup.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env), reading from `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let host = var("HOST", "0.0.0.0");

        let port: u16 = var("PORT", "10000")
            .parse()
            .expect("PORT must be a valid u16");

        let request_timeout_secs: u64 = var("REQUEST_TIMEOUT_SECS", "30")
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let store_backend: StoreBackend = var("STORE_BACKEND", "postgres")
            .parse()
            .unwrap_or_else(|e| panic!("STORE_BACKEND: {e}"));

        let database_url = lookup("DATABASE_URL").filter(|url| !url.is_empty());
        if store_backend == StoreBackend::Postgres && database_url.is_none() {
            panic!("DATABASE_URL must be set when STORE_BACKEND is postgres");
        }

        let naming = NamingPolicy {
            max_name_len: var("MAX_SERVICE_NAME_LEN", &DEFAULT_MAX_NAME_LEN.to_string())
                .parse()
                .expect("MAX_SERVICE_NAME_LEN must be a valid usize"),
            max_namespace_len: var(
                "MAX_SERVICE_NAMESPACE_LEN",
                &DEFAULT_MAX_NAMESPACE_LEN.to_string(),
            )
            .parse()
            .expect("MAX_SERVICE_NAMESPACE_LEN must be a valid usize"),
        };

        let notifier_url = var("DEPLOYMENT_NOTIFIER_URL", "http://localhost:10004");

        let notifier_timeout_secs: u64 = var(
            "NOTIFIER_TIMEOUT_SECS",
            &DEFAULT_NOTIFY_TIMEOUT.as_secs().to_string(),
        )
        .parse()
        .expect("NOTIFIER_TIMEOUT_SECS must be a valid u64");

        let queue_capacity: usize = var(
            "DEPLOYMENT_QUEUE_CAPACITY",
            &DEFAULT_QUEUE_CAPACITY.to_string(),
        )
        .parse()
        .expect("DEPLOYMENT_QUEUE_CAPACITY must be a valid usize");

        Self {
            host,
            port,
            request_timeout_secs,
            store_backend,
            database_url,
            naming,
            notifier_url,
            notifier_timeout_secs,
            queue_capacity,
        }
    }
}
