//! Route definitions for the `/applications` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::services;
use crate::state::AppState;

/// Routes mounted at `/applications`.
///
/// ```text
/// GET /{id}/services -> list_application_services
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}/services", get(services::list_application_services))
}
