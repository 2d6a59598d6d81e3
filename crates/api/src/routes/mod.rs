pub mod applications;
pub mod health;
pub mod services;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /services                         create (POST)
/// /services/{id}                    get, delete
/// /applications/{id}/services       list
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/services", services::router())
        .nest("/applications", applications::router())
}
