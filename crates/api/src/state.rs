use std::sync::Arc;

use sysmgr_core::lifecycle::JobLifecycleManager;
use sysmgr_db::DbPool;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    /// Lifecycle manager over the configured stores.
    pub lifecycle: Arc<JobLifecycleManager>,
    pub config: Arc<ServerConfig>,
    /// Database pool, absent for the in-memory backend.
    pub db: Option<DbPool>,
}
