//! Job records and the job record builder.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::Application;
use crate::sla::MicroserviceSpec;
use crate::types::{ResourceId, Timestamp};

/// Status ID type matching SMALLINT in the `job_statuses` lookup table.
pub type StatusId = i16;

/// Deployment lifecycle of a job.
///
/// Discriminants match the seed order of the `job_statuses` table.
#[repr(i16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending = 1,
    Deployed = 2,
    Failed = 3,
    Removed = 4,
}

impl JobStatus {
    /// Return the database status ID.
    pub fn id(self) -> StatusId {
        self as StatusId
    }

    /// Inverse of [`JobStatus::id`].
    pub fn from_id(id: StatusId) -> Option<Self> {
        match id {
            1 => Some(Self::Pending),
            2 => Some(Self::Deployed),
            3 => Some(Self::Failed),
            4 => Some(Self::Removed),
            _ => None,
        }
    }
}

impl From<JobStatus> for StatusId {
    fn from(value: JobStatus) -> Self {
        value as StatusId
    }
}

/// A persisted microservice instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub job_id: ResourceId,
    pub application_id: ResourceId,
    /// Fully qualified `app.appns.service.servicens` name.
    pub job_name: String,
    pub microservice_name: String,
    pub microservice_namespace: String,
    pub application_name: String,
    pub application_namespace: String,
    pub image: Option<String>,
    pub spec: MicroserviceSpec,
    pub status: JobStatus,
    pub created_at: Timestamp,
}

impl Job {
    pub fn identity(&self) -> (&str, &str) {
        (&self.microservice_name, &self.microservice_namespace)
    }
}

/// Placement context handed to the deployment subsystem with a new job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentContext {
    pub application_id: ResourceId,
    pub application_name: String,
    pub application_namespace: String,
    pub owner_id: String,
}

impl From<&Application> for DeploymentContext {
    fn from(app: &Application) -> Self {
        Self {
            application_id: app.application_id,
            application_name: app.application_name.clone(),
            application_namespace: app.application_namespace.clone(),
            owner_id: app.owner_id.clone(),
        }
    }
}

/// Build the job record for `spec` as a member of `application`.
///
/// Ids are UUID v7; the job store's primary key rejects the (practically
/// impossible) collision.
pub fn build_job(application: &Application, spec: &MicroserviceSpec) -> Job {
    Job {
        job_id: Uuid::now_v7(),
        application_id: application.application_id,
        job_name: qualified_name(application, spec),
        microservice_name: spec.microservice_name.clone(),
        microservice_namespace: spec.microservice_namespace.clone(),
        application_name: application.application_name.clone(),
        application_namespace: application.application_namespace.clone(),
        image: spec.code.clone(),
        spec: spec.clone(),
        status: JobStatus::Pending,
        created_at: Utc::now(),
    }
}

fn qualified_name(application: &Application, spec: &MicroserviceSpec) -> String {
    format!(
        "{}.{}.{}.{}",
        application.application_name,
        application.application_namespace,
        spec.microservice_name,
        spec.microservice_namespace
    )
}
