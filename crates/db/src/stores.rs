//! Adapters from the repositories to the core store traits.

use async_trait::async_trait;
use sqlx::PgPool;
use sysmgr_core::application::Application;
use sysmgr_core::job::Job;
use sysmgr_core::store::{ApplicationRegistry, JobStore, StoreError};
use sysmgr_core::types::ResourceId;

use crate::repositories::{ApplicationRepo, JobRepo};

/// PostgreSQL unique constraint violation.
const UNIQUE_VIOLATION: &str = "23505";

/// Map a sqlx error onto the store taxonomy.
///
/// Unique violations become [`StoreError::Conflict`] naming the constraint;
/// everything else is a backend failure.
pub fn classify(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            let constraint = db_err.constraint().unwrap_or("unknown");
            return StoreError::Conflict(format!(
                "duplicate value violates unique constraint: {constraint}"
            ));
        }
    }
    tracing::error!(error = %err, "Database error");
    StoreError::Backend(err.to_string())
}

#[derive(Debug, Clone)]
pub struct PgApplicationRegistry {
    pool: PgPool,
}

impl PgApplicationRegistry {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ApplicationRegistry for PgApplicationRegistry {
    async fn find_by_key(
        &self,
        name: &str,
        namespace: &str,
    ) -> Result<Option<Application>, StoreError> {
        let row = ApplicationRepo::find_by_name_and_namespace(&self.pool, name, namespace)
            .await
            .map_err(classify)?;
        Ok(row.map(Application::from))
    }

    async fn find_by_id(&self, id: ResourceId) -> Result<Option<Application>, StoreError> {
        let row = ApplicationRepo::find_by_id(&self.pool, id)
            .await
            .map_err(classify)?;
        Ok(row.map(Application::from))
    }

    async fn append_microservice(
        &self,
        app_id: ResourceId,
        job_id: ResourceId,
    ) -> Result<bool, StoreError> {
        ApplicationRepo::append_microservice(&self.pool, app_id, job_id)
            .await
            .map_err(classify)
    }

    async fn remove_microservice(
        &self,
        app_id: ResourceId,
        job_id: ResourceId,
    ) -> Result<bool, StoreError> {
        ApplicationRepo::remove_microservice(&self.pool, app_id, job_id)
            .await
            .map_err(classify)
    }
}

#[derive(Debug, Clone)]
pub struct PgJobStore {
    pool: PgPool,
}

impl PgJobStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn into_job(row: crate::models::job::JobRow) -> Result<Job, StoreError> {
    Job::try_from(row).map_err(|e| StoreError::Backend(e.to_string()))
}

#[async_trait]
impl JobStore for PgJobStore {
    async fn insert(&self, job: &Job) -> Result<(), StoreError> {
        JobRepo::insert(&self.pool, job).await.map_err(classify)?;
        Ok(())
    }

    async fn find_by_id(&self, id: ResourceId) -> Result<Option<Job>, StoreError> {
        JobRepo::find_by_id(&self.pool, id)
            .await
            .map_err(classify)?
            .map(into_job)
            .transpose()
    }

    async fn find_many(&self, ids: &[ResourceId]) -> Result<Vec<Job>, StoreError> {
        JobRepo::find_many(&self.pool, ids)
            .await
            .map_err(classify)?
            .into_iter()
            .map(into_job)
            .collect()
    }

    async fn list_by_application(&self, app_id: ResourceId) -> Result<Vec<Job>, StoreError> {
        JobRepo::list_by_application(&self.pool, app_id)
            .await
            .map_err(classify)?
            .into_iter()
            .map(into_job)
            .collect()
    }

    async fn delete(&self, id: ResourceId) -> Result<bool, StoreError> {
        JobRepo::delete(&self.pool, id).await.map_err(classify)
    }
}
