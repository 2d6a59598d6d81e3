//! In-memory store implementations.
//!
//! Each store keeps its records behind a tokio `RwLock`; every mutation
//! happens under one write-lock acquisition, which makes the membership
//! append and remove atomic in the same sense as a single-document update.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ApplicationRegistry, JobStore, StoreError};
use crate::application::Application;
use crate::job::Job;
use crate::types::ResourceId;

#[derive(Debug, Default)]
pub struct InMemoryApplicationRegistry {
    apps: RwLock<HashMap<ResourceId, Application>>,
}

impl InMemoryApplicationRegistry {
    /// Register an application with empty membership.
    pub async fn create(
        &self,
        owner_id: &str,
        name: &str,
        namespace: &str,
    ) -> Result<Application, StoreError> {
        let app = Application {
            application_id: Uuid::now_v7(),
            owner_id: owner_id.to_string(),
            application_name: name.to_string(),
            application_namespace: namespace.to_string(),
            application_desc: None,
            microservices: Vec::new(),
        };
        self.insert(app.clone()).await?;
        Ok(app)
    }

    /// Register an application as given.
    ///
    /// `(name, namespace)` must be unique.
    pub async fn insert(&self, app: Application) -> Result<(), StoreError> {
        let mut apps = self.apps.write().await;
        let taken = apps.values().any(|a| {
            a.application_name == app.application_name
                && a.application_namespace == app.application_namespace
        });
        if taken || apps.contains_key(&app.application_id) {
            return Err(StoreError::Conflict(format!(
                "application {}/{} already exists",
                app.application_name, app.application_namespace
            )));
        }
        apps.insert(app.application_id, app);
        Ok(())
    }

    #[cfg(test)]
    pub async fn remove(&self, id: ResourceId) -> Option<Application> {
        self.apps.write().await.remove(&id)
    }

    pub async fn len(&self) -> usize {
        self.apps.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.apps.read().await.is_empty()
    }
}

#[async_trait]
impl ApplicationRegistry for InMemoryApplicationRegistry {
    async fn find_by_key(
        &self,
        name: &str,
        namespace: &str,
    ) -> Result<Option<Application>, StoreError> {
        let apps = self.apps.read().await;
        Ok(apps
            .values()
            .find(|a| a.application_name == name && a.application_namespace == namespace)
            .cloned())
    }

    async fn find_by_id(&self, id: ResourceId) -> Result<Option<Application>, StoreError> {
        Ok(self.apps.read().await.get(&id).cloned())
    }

    async fn append_microservice(
        &self,
        app_id: ResourceId,
        job_id: ResourceId,
    ) -> Result<bool, StoreError> {
        let mut apps = self.apps.write().await;
        match apps.get_mut(&app_id) {
            Some(app) => {
                app.microservices.push(job_id);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove_microservice(
        &self,
        app_id: ResourceId,
        job_id: ResourceId,
    ) -> Result<bool, StoreError> {
        let mut apps = self.apps.write().await;
        match apps.get_mut(&app_id) {
            Some(app) => {
                app.microservices.retain(|id| *id != job_id);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[derive(Debug, Default)]
pub struct InMemoryJobStore {
    jobs: RwLock<HashMap<ResourceId, Job>>,
}

impl InMemoryJobStore {
    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.jobs.read().await.is_empty()
    }
}

#[async_trait]
impl JobStore for InMemoryJobStore {
    async fn insert(&self, job: &Job) -> Result<(), StoreError> {
        let mut jobs = self.jobs.write().await;
        if jobs.contains_key(&job.job_id) {
            return Err(StoreError::Conflict(format!("job {} already exists", job.job_id)));
        }
        let duplicate = jobs
            .values()
            .any(|j| j.application_id == job.application_id && j.identity() == job.identity());
        if duplicate {
            return Err(StoreError::Conflict(format!(
                "service {}.{} already exists in application {}",
                job.microservice_name, job.microservice_namespace, job.application_id
            )));
        }
        jobs.insert(job.job_id, job.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: ResourceId) -> Result<Option<Job>, StoreError> {
        Ok(self.jobs.read().await.get(&id).cloned())
    }

    async fn find_many(&self, ids: &[ResourceId]) -> Result<Vec<Job>, StoreError> {
        let jobs = self.jobs.read().await;
        Ok(ids.iter().filter_map(|id| jobs.get(id).cloned()).collect())
    }

    async fn list_by_application(&self, app_id: ResourceId) -> Result<Vec<Job>, StoreError> {
        let mut found: Vec<Job> = self
            .jobs
            .read()
            .await
            .values()
            .filter(|j| j.application_id == app_id)
            .cloned()
            .collect();
        found.sort_by_key(|j| (j.created_at, j.job_id));
        Ok(found)
    }

    async fn delete(&self, id: ResourceId) -> Result<bool, StoreError> {
        Ok(self.jobs.write().await.remove(&id).is_some())
    }
}
