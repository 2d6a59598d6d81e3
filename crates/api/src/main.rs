use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use sysmgr_core::lifecycle::JobLifecycleManager;
use sysmgr_core::store::Stores;
use sysmgr_db::Database;
use sysmgr_events::{DeploymentDispatcher, DeploymentWorker, HttpDeploymentNotifier};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sysmgr_api::config::{ServerConfig, StoreBackend};
use sysmgr_api::router::build_app_router;
use sysmgr_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "sysmgr_api=debug,sysmgr_core=debug,sysmgr_events=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = config.port,
        store_backend = config.store_backend.as_str(),
        max_name_len = config.naming.max_name_len,
        max_namespace_len = config.naming.max_namespace_len,
        "Loaded server configuration",
    );

    // --- Stores ---
    let database = match config.store_backend {
        StoreBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL must be set")?;
            Some(Database::open(url).await.context("Failed to open database")?)
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory stores; state is lost on restart");
            None
        }
    };
    let stores = match &database {
        Some(db) => db.stores(),
        None => Stores::in_memory().0,
    };

    // --- Deployment dispatch ---
    let (dispatcher, queue) = DeploymentDispatcher::new(config.queue_capacity);
    let notifier_timeout = Duration::from_secs(config.notifier_timeout_secs);
    let downstream = HttpDeploymentNotifier::new(config.notifier_url.clone(), notifier_timeout);
    tracing::info!(url = downstream.base_url(), "Deployment notifier configured");

    let worker_cancel = CancellationToken::new();
    let worker = DeploymentWorker::new(Arc::new(downstream), notifier_timeout);
    let worker_handle = tokio::spawn(worker.run(queue, worker_cancel.clone()));

    // --- App state ---
    let lifecycle = JobLifecycleManager::new(stores, Arc::new(dispatcher), config.naming);
    let state = AppState {
        lifecycle: Arc::new(lifecycle),
        config: Arc::new(config.clone()),
        db: database.as_ref().map(|db| db.pool().clone()),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let host = config
        .host
        .parse()
        .with_context(|| format!("Invalid HOST address '{}'", config.host))?;
    let addr = SocketAddr::new(host, config.port);
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    worker_cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), worker_handle).await;
    tracing::info!("Deployment worker stopped");

    if let Some(db) = database {
        db.close().await;
    }

    tracing::info!("Graceful shutdown complete");
    Ok(())
}

/// Wait for SIGINT or SIGTERM to initiate graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
