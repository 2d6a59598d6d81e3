//! Models for the `applications` table.

use serde::Deserialize;
use sqlx::FromRow;
use sysmgr_core::application::Application;
use sysmgr_core::types::{ResourceId, Timestamp};

/// A row from the `applications` table.
#[derive(Debug, Clone, FromRow)]
pub struct ApplicationRow {
    pub id: ResourceId,
    pub owner_id: String,
    pub name: String,
    pub namespace: String,
    pub description: Option<String>,
    pub microservices: Vec<ResourceId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<ApplicationRow> for Application {
    fn from(row: ApplicationRow) -> Self {
        Self {
            application_id: row.id,
            owner_id: row.owner_id,
            application_name: row.name,
            application_namespace: row.namespace,
            application_desc: row.description,
            microservices: row.microservices,
        }
    }
}

/// DTO for registering an application.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateApplication {
    pub owner_id: String,
    pub name: String,
    pub namespace: String,
    pub description: Option<String>,
}
