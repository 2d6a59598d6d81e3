//! Store seams consumed by the lifecycle manager.
//!
//! The application registry and the job store are external, shared
//! resources. Membership changes go through single-record atomic
//! primitives (`append_microservice` / `remove_microservice`), never a
//! read-modify-write of the whole application.

pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::Application;
use crate::job::Job;
use crate::types::ResourceId;

pub use memory::{InMemoryApplicationRegistry, InMemoryJobStore};

/// Failure of an underlying store call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write.
    #[error("conflict: {0}")]
    Conflict(String),

    /// I/O, network or any other backend failure.
    #[error("backend error: {0}")]
    Backend(String),
}

/// Read and membership access to the application registry.
#[async_trait]
pub trait ApplicationRegistry: Send + Sync {
    async fn find_by_key(
        &self,
        name: &str,
        namespace: &str,
    ) -> Result<Option<Application>, StoreError>;

    async fn find_by_id(&self, id: ResourceId) -> Result<Option<Application>, StoreError>;

    /// Atomically append `job_id` to the application's membership.
    ///
    /// Returns `false` if the application no longer exists.
    async fn append_microservice(
        &self,
        app_id: ResourceId,
        job_id: ResourceId,
    ) -> Result<bool, StoreError>;

    /// Atomically remove `job_id` from the application's membership.
    ///
    /// Returns `false` if the application no longer exists.
    async fn remove_microservice(
        &self,
        app_id: ResourceId,
        job_id: ResourceId,
    ) -> Result<bool, StoreError>;
}

/// Persistence for job records.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Insert a new job. A duplicate id or identity is a [`StoreError::Conflict`].
    async fn insert(&self, job: &Job) -> Result<(), StoreError>;

    async fn find_by_id(&self, id: ResourceId) -> Result<Option<Job>, StoreError>;

    /// Fetch the jobs for `ids`, in the order given. Unknown ids are skipped.
    async fn find_many(&self, ids: &[ResourceId]) -> Result<Vec<Job>, StoreError>;

    /// Every stored job of an application, member or not, oldest first.
    async fn list_by_application(&self, app_id: ResourceId) -> Result<Vec<Job>, StoreError>;

    /// Delete a job. Returns `false` if it did not exist.
    async fn delete(&self, id: ResourceId) -> Result<bool, StoreError>;
}

/// Store handles passed into the lifecycle manager.
#[derive(Clone)]
pub struct Stores {
    pub applications: Arc<dyn ApplicationRegistry>,
    pub jobs: Arc<dyn JobStore>,
}

impl Stores {
    pub fn new(applications: Arc<dyn ApplicationRegistry>, jobs: Arc<dyn JobStore>) -> Self {
        Self { applications, jobs }
    }

    /// Fresh, empty in-memory stores.
    ///
    /// The concrete handles are returned as well so callers can seed the
    /// registry.
    pub fn in_memory() -> (Self, Arc<InMemoryApplicationRegistry>, Arc<InMemoryJobStore>) {
        let applications = Arc::new(InMemoryApplicationRegistry::default());
        let jobs = Arc::new(InMemoryJobStore::default());
        let stores = Self::new(applications.clone(), jobs.clone());
        (stores, applications, jobs)
    }
}
