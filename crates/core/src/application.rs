//! Application as seen by the lifecycle manager.

use serde::{Deserialize, Serialize};

use crate::types::ResourceId;

/// An application owned by one user.
///
/// `microservices` lists the ids of the application's live jobs in the
/// order they were added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub application_id: ResourceId,
    pub owner_id: String,
    pub application_name: String,
    pub application_namespace: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_desc: Option<String>,
    #[serde(default)]
    pub microservices: Vec<ResourceId>,
}

impl Application {
    pub fn is_owned_by(&self, owner_id: &str) -> bool {
        self.owner_id == owner_id
    }

    pub fn has_member(&self, job_id: &ResourceId) -> bool {
        self.microservices.contains(job_id)
    }
}
