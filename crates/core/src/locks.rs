//! Per-application serialization scopes.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::types::ResourceId;

/// Hands out one async mutex per application id.
///
/// Calls on different applications never contend. Entries nobody holds are
/// pruned on the next acquisition.
#[derive(Debug, Default)]
pub struct AppLocks {
    scopes: Mutex<HashMap<ResourceId, Arc<Mutex<()>>>>,
}

impl AppLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `app_id`'s membership.
    pub async fn lock(&self, app_id: ResourceId) -> OwnedMutexGuard<()> {
        let scope = {
            let mut scopes = self.scopes.lock().await;
            scopes.retain(|id, scope| *id == app_id || Arc::strong_count(scope) > 1);
            Arc::clone(scopes.entry(app_id).or_default())
        };
        scope.lock_owned().await
    }

    /// Number of applications with a live scope.
    #[cfg(test)]
    pub async fn active(&self) -> usize {
        self.scopes.lock().await.len()
    }
}
