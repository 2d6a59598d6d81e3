//! Route definitions for the `/services` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::services;
use crate::state::AppState;

/// Routes mounted at `/services`.
///
/// ```text
/// POST   /        -> create_services
/// GET    /{id}    -> get_service
/// DELETE /{id}    -> delete_service
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(services::create_services))
        .route(
            "/{id}",
            get(services::get_service).delete(services::delete_service),
        )
}
