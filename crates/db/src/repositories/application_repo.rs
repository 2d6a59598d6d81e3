//! Repository for the `applications` table.

use sqlx::PgPool;
use sysmgr_core::types::ResourceId;
use uuid::Uuid;

use crate::models::application::{ApplicationRow, CreateApplication};

/// Column list for `applications` queries.
const COLUMNS: &str =
    "id, owner_id, name, namespace, description, microservices, created_at, updated_at";

pub struct ApplicationRepo;

impl ApplicationRepo {
    /// Register an application with empty membership.
    pub async fn create(
        pool: &PgPool,
        input: &CreateApplication,
    ) -> Result<ApplicationRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO applications (id, owner_id, name, namespace, description) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ApplicationRow>(&query)
            .bind(Uuid::now_v7())
            .bind(&input.owner_id)
            .bind(&input.name)
            .bind(&input.namespace)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: ResourceId,
    ) -> Result<Option<ApplicationRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM applications WHERE id = $1");
        sqlx::query_as::<_, ApplicationRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_name_and_namespace(
        pool: &PgPool,
        name: &str,
        namespace: &str,
    ) -> Result<Option<ApplicationRow>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM applications WHERE name = $1 AND namespace = $2");
        sqlx::query_as::<_, ApplicationRow>(&query)
            .bind(name)
            .bind(namespace)
            .fetch_optional(pool)
            .await
    }

    /// Append a job id to the membership in one statement.
    ///
    /// Returns `false` if the application does not exist.
    pub async fn append_microservice(
        pool: &PgPool,
        app_id: ResourceId,
        job_id: ResourceId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE applications \
             SET microservices = array_append(microservices, $2), updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(app_id)
        .bind(job_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove every occurrence of a job id from the membership in one statement.
    ///
    /// Returns `false` if the application does not exist.
    pub async fn remove_microservice(
        pool: &PgPool,
        app_id: ResourceId,
        job_id: ResourceId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE applications \
             SET microservices = array_remove(microservices, $2), updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(app_id)
        .bind(job_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
