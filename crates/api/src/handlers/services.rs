//! Handlers for the `/services` resource and an application's service list.
//!
//! Thin wrappers over [`JobLifecycleManager`](sysmgr_core::lifecycle::JobLifecycleManager):
//! decode the request, call the manager, wrap the result.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use sysmgr_core::error::CoreError;
use sysmgr_core::job::Job;
use sysmgr_core::sla::Sla;
use sysmgr_core::types::{parse_resource_id, ResourceId};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::owner::OwnerId;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/services
///
/// Create jobs for every microservice of the SLA's application that is not
/// deployed yet. Returns only the newly created jobs.
pub async fn create_services(
    State(state): State<AppState>,
    owner: OwnerId,
    Json(sla): Json<Sla>,
) -> AppResult<Json<DataResponse<Vec<Job>>>> {
    sla.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let jobs = state.lifecycle.create_services(owner.as_str(), &sla).await?;
    Ok(Json(DataResponse { data: jobs }))
}

/// GET /api/v1/services/{id}
pub async fn get_service(
    State(state): State<AppState>,
    owner: OwnerId,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<Job>>> {
    let job_id = resource_id("Job", &id)?;
    let job = state.lifecycle.get_service(owner.as_str(), job_id).await?;
    Ok(Json(DataResponse { data: job }))
}

/// DELETE /api/v1/services/{id}
///
/// Returns 204 on removal, 404 if the job (or its application) is unknown.
pub async fn delete_service(
    State(state): State<AppState>,
    owner: OwnerId,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let job_id = resource_id("Job", &id)?;
    if state.lifecycle.delete_service(owner.as_str(), job_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found("Job", &id))
    }
}

/// GET /api/v1/applications/{id}/services
pub async fn list_application_services(
    State(state): State<AppState>,
    owner: OwnerId,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<Vec<Job>>>> {
    let app_id = resource_id("Application", &id)?;
    let jobs = state.lifecycle.list_services(owner.as_str(), app_id).await?;
    Ok(Json(DataResponse { data: jobs }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// An id that cannot be parsed names nothing, so it is reported as not found.
fn resource_id(entity: &'static str, raw: &str) -> AppResult<ResourceId> {
    parse_resource_id(raw).ok_or_else(|| not_found(entity, raw))
}

fn not_found(entity: &'static str, id: &str) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity,
        id: id.to_string(),
    })
}
