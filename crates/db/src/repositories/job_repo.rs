//! Repository for the `jobs` table.

use sqlx::types::Json;
use sqlx::PgPool;
use sysmgr_core::job::Job;
use sysmgr_core::types::ResourceId;

use crate::models::job::JobRow;

/// Column list for `jobs` queries.
const COLUMNS: &str = "\
    id, application_id, job_name, microservice_name, microservice_namespace, \
    application_name, application_namespace, image, spec, status_id, \
    created_at, updated_at";

pub struct JobRepo;

impl JobRepo {
    /// Insert a job built by the lifecycle manager. The id is taken from the
    /// record, not generated here.
    pub async fn insert(pool: &PgPool, job: &Job) -> Result<JobRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO jobs \
                 (id, application_id, job_name, microservice_name, microservice_namespace, \
                  application_name, application_namespace, image, spec, status_id, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, JobRow>(&query)
            .bind(job.job_id)
            .bind(job.application_id)
            .bind(&job.job_name)
            .bind(&job.microservice_name)
            .bind(&job.microservice_namespace)
            .bind(&job.application_name)
            .bind(&job.application_namespace)
            .bind(&job.image)
            .bind(Json(&job.spec))
            .bind(job.status.id())
            .bind(job.created_at)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: ResourceId) -> Result<Option<JobRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM jobs WHERE id = $1");
        sqlx::query_as::<_, JobRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Fetch the rows for `ids`, ordered as given.
    pub async fn find_many(pool: &PgPool, ids: &[ResourceId]) -> Result<Vec<JobRow>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "SELECT {COLUMNS} FROM jobs \
             WHERE id = ANY($1::uuid[]) \
             ORDER BY array_position($1::uuid[], id)"
        );
        sqlx::query_as::<_, JobRow>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    pub async fn list_by_application(
        pool: &PgPool,
        application_id: ResourceId,
    ) -> Result<Vec<JobRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM jobs WHERE application_id = $1 ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, JobRow>(&query)
            .bind(application_id)
            .fetch_all(pool)
            .await
    }

    /// Delete a job. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: ResourceId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
