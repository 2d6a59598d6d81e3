//! Models for the `jobs` table.

use sqlx::types::Json;
use sqlx::FromRow;
use sysmgr_core::job::{Job, JobStatus, StatusId};
use sysmgr_core::sla::MicroserviceSpec;
use sysmgr_core::types::{ResourceId, Timestamp};

/// A row from the `jobs` table.
#[derive(Debug, Clone, FromRow)]
pub struct JobRow {
    pub id: ResourceId,
    pub application_id: ResourceId,
    pub job_name: String,
    pub microservice_name: String,
    pub microservice_namespace: String,
    pub application_name: String,
    pub application_namespace: String,
    pub image: Option<String>,
    pub spec: Json<MicroserviceSpec>,
    pub status_id: StatusId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// The row carried a status id with no [`JobStatus`] counterpart.
#[derive(Debug, thiserror::Error)]
#[error("job {job_id} has unknown status id {status_id}")]
pub struct UnknownStatus {
    pub job_id: ResourceId,
    pub status_id: StatusId,
}

impl TryFrom<JobRow> for Job {
    type Error = UnknownStatus;

    fn try_from(row: JobRow) -> Result<Self, Self::Error> {
        let status = JobStatus::from_id(row.status_id).ok_or(UnknownStatus {
            job_id: row.id,
            status_id: row.status_id,
        })?;
        Ok(Self {
            job_id: row.id,
            application_id: row.application_id,
            job_name: row.job_name,
            microservice_name: row.microservice_name,
            microservice_namespace: row.microservice_namespace,
            application_name: row.application_name,
            application_namespace: row.application_namespace,
            image: row.image,
            spec: row.spec.0,
            status,
            created_at: row.created_at,
        })
    }
}
