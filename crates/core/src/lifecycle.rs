//! Job lifecycle manager.
//!
//! Creates and removes the jobs of an application while keeping the
//! application's membership list and the job store in agreement:
//!
//! - every membership entry refers to an existing job of that application;
//! - every job is listed in its application's membership.
//!
//! Membership changes use the registry's atomic append/remove and run inside
//! a per-application [`AppLocks`] scope. Deployment notifications are sent
//! only once a job is both stored and a member; a failed notification is
//! logged and never undoes the committed change.

use std::collections::HashSet;
use std::sync::Arc;

use crate::application::Application;
use crate::error::CoreError;
use crate::job::{build_job, DeploymentContext, Job, JobStatus};
use crate::locks::AppLocks;
use crate::notifier::DeploymentNotifier;
use crate::sla::{ApplicationDescriptor, MicroserviceSpec, Sla};
use crate::store::{ApplicationRegistry, JobStore, Stores};
use crate::types::{parse_resource_id, ResourceId};
use crate::validation::{self, NamingPolicy};

pub struct JobLifecycleManager {
    applications: Arc<dyn ApplicationRegistry>,
    jobs: Arc<dyn JobStore>,
    notifier: Arc<dyn DeploymentNotifier>,
    policy: NamingPolicy,
    locks: AppLocks,
}

impl JobLifecycleManager {
    pub fn new(
        stores: Stores,
        notifier: Arc<dyn DeploymentNotifier>,
        policy: NamingPolicy,
    ) -> Self {
        Self {
            applications: stores.applications,
            jobs: stores.jobs,
            notifier,
            policy,
            locks: AppLocks::new(),
        }
    }

    /// Create a job for every microservice of the SLA's application that is
    /// not already a member.
    ///
    /// Returns the newly committed jobs (empty when nothing was missing). The
    /// whole batch is validated before anything is written: a single naming
    /// violation rejects it with [`CoreError::InvalidSpec`].
    ///
    /// State left by an interrupted create or delete is repaired first: a
    /// stored job that never made it into the membership is adopted instead
    /// of rebuilt, and membership entries without a job are pruned.
    pub async fn create_services(&self, owner_id: &str, sla: &Sla) -> Result<Vec<Job>, CoreError> {
        let descriptor = sla.application().ok_or_else(|| {
            CoreError::Validation("SLA does not describe an application".into())
        })?;

        let resolved = self.resolve_application(descriptor).await?;
        ensure_owner(&resolved, owner_id)?;

        let _scope = self.locks.lock(resolved.application_id).await;

        // Membership may have moved while waiting for the scope.
        let app = self
            .applications
            .find_by_id(resolved.application_id)
            .await?
            .ok_or_else(|| CoreError::application_not_found(resolved.application_id))?;

        let stored = self.jobs.list_by_application(app.application_id).await?;
        self.prune_dangling(&app, &stored).await?;

        let (members, orphans): (Vec<Job>, Vec<Job>) = stored
            .into_iter()
            .partition(|job| app.has_member(&job.job_id));
        let pending = missing_services(&descriptor.microservices, &members);

        validation::validate_batch(&self.policy, pending.iter().copied()).inspect_err(|e| {
            tracing::info!(
                application_id = %app.application_id,
                error = %e,
                "Rejected service batch",
            );
        })?;

        let context = DeploymentContext::from(&app);
        let mut created = Vec::with_capacity(pending.len());

        for spec in pending {
            let job = match orphans.iter().find(|o| o.identity() == spec.identity()) {
                Some(orphan) => {
                    self.adopt_job(orphan).await?;
                    orphan.clone()
                }
                None => {
                    let job = build_job(&app, spec);
                    self.commit_job(&job).await?;
                    job
                }
            };

            tracing::info!(
                job_id = %job.job_id,
                job_name = %job.job_name,
                application_id = %app.application_id,
                owner_id,
                "Service created",
            );

            if let Err(e) = self.notifier.notify_deploy(&job, &context).await {
                tracing::warn!(
                    job_id = %job.job_id,
                    error = %e,
                    "Deploy notification failed (job stays committed)",
                );
            }
            created.push(job);
        }

        Ok(created)
    }

    /// Remove a job and its membership entry.
    ///
    /// Returns `Ok(false)` if the job or its application cannot be resolved,
    /// and [`CoreError::PermissionDenied`] if `owner_id` does not own the
    /// application.
    pub async fn delete_service(
        &self,
        owner_id: &str,
        job_id: ResourceId,
    ) -> Result<bool, CoreError> {
        let Some(job) = self.jobs.find_by_id(job_id).await? else {
            return Ok(false);
        };
        let Some(app) = self.applications.find_by_id(job.application_id).await? else {
            tracing::warn!(
                %job_id,
                application_id = %job.application_id,
                "Job has no application",
            );
            return Ok(false);
        };
        ensure_owner(&app, owner_id)?;

        let _scope = self.locks.lock(app.application_id).await;

        if !self.jobs.delete(job_id).await? {
            return Ok(false);
        }

        match self
            .applications
            .remove_microservice(app.application_id, job_id)
            .await
        {
            Ok(true) => {}
            Ok(false) => {
                // Application vanished after resolution; nothing left to list the job.
                tracing::warn!(
                    %job_id,
                    application_id = %app.application_id,
                    "Application removed concurrently",
                );
            }
            Err(e) => {
                self.restore_job(&job).await;
                return Err(e.into());
            }
        }

        tracing::info!(%job_id, application_id = %app.application_id, owner_id, "Service deleted");

        let removed = Job {
            status: JobStatus::Removed,
            ..job
        };
        if let Err(e) = self.notifier.notify_undeploy(&removed).await {
            tracing::warn!(%job_id, error = %e, "Undeploy notification failed");
        }

        Ok(true)
    }

    /// Fetch one job, checking that `owner_id` owns its application.
    pub async fn get_service(&self, owner_id: &str, job_id: ResourceId) -> Result<Job, CoreError> {
        let job = self
            .jobs
            .find_by_id(job_id)
            .await?
            .ok_or_else(|| CoreError::job_not_found(job_id))?;
        let app = self
            .applications
            .find_by_id(job.application_id)
            .await?
            .ok_or_else(|| CoreError::job_not_found(job_id))?;
        ensure_owner(&app, owner_id)?;
        Ok(job)
    }

    /// List an application's jobs in membership order.
    pub async fn list_services(
        &self,
        owner_id: &str,
        app_id: ResourceId,
    ) -> Result<Vec<Job>, CoreError> {
        let app = self
            .applications
            .find_by_id(app_id)
            .await?
            .ok_or_else(|| CoreError::application_not_found(app_id))?;
        ensure_owner(&app, owner_id)?;
        Ok(self.jobs.find_many(&app.microservices).await?)
    }

    async fn resolve_application(
        &self,
        descriptor: &ApplicationDescriptor,
    ) -> Result<Application, CoreError> {
        match descriptor.application_id.as_deref().filter(|id| !id.is_empty()) {
            Some(raw) => {
                let found = match parse_resource_id(raw) {
                    Some(id) => self.applications.find_by_id(id).await?,
                    None => None,
                };
                found.ok_or_else(|| CoreError::application_not_found(raw))
            }
            None => self
                .applications
                .find_by_key(&descriptor.application_name, &descriptor.application_namespace)
                .await?
                .ok_or_else(|| {
                    CoreError::application_not_found(format!(
                        "{}/{}",
                        descriptor.application_name, descriptor.application_namespace
                    ))
                }),
        }
    }

    /// Persist `job` and make it a member of its application.
    ///
    /// If the membership append does not succeed the job record is deleted
    /// again, so no job outlives a failed append.
    async fn commit_job(&self, job: &Job) -> Result<(), CoreError> {
        self.jobs.insert(job).await?;

        let appended = self
            .applications
            .append_microservice(job.application_id, job.job_id)
            .await;

        match appended {
            Ok(true) => Ok(()),
            Ok(false) => {
                self.discard_job(job).await;
                Err(CoreError::application_not_found(job.application_id))
            }
            Err(e) => {
                self.discard_job(job).await;
                Err(e.into())
            }
        }
    }

    /// Make an already stored job a member of its application.
    async fn adopt_job(&self, job: &Job) -> Result<(), CoreError> {
        if !self
            .applications
            .append_microservice(job.application_id, job.job_id)
            .await?
        {
            return Err(CoreError::application_not_found(job.application_id));
        }
        tracing::info!(
            job_id = %job.job_id,
            application_id = %job.application_id,
            "Adopted job missing from membership",
        );
        Ok(())
    }

    /// Drop membership entries that refer to no stored job of `app`.
    async fn prune_dangling(&self, app: &Application, stored: &[Job]) -> Result<(), CoreError> {
        let known: HashSet<ResourceId> = stored.iter().map(|job| job.job_id).collect();
        for &job_id in app.microservices.iter().filter(|id| !known.contains(*id)) {
            tracing::warn!(
                %job_id,
                application_id = %app.application_id,
                "Pruning membership entry without a job",
            );
            self.applications
                .remove_microservice(app.application_id, job_id)
                .await?;
        }
        Ok(())
    }

    async fn discard_job(&self, job: &Job) {
        if let Err(e) = self.jobs.delete(job.job_id).await {
            tracing::error!(
                job_id = %job.job_id,
                error = %e,
                "Failed to discard job after membership append failed",
            );
        }
    }

    async fn restore_job(&self, job: &Job) {
        if let Err(e) = self.jobs.insert(job).await {
            tracing::error!(
                job_id = %job.job_id,
                error = %e,
                "Failed to restore job after membership removal failed",
            );
        }
    }
}

fn ensure_owner(app: &Application, owner_id: &str) -> Result<(), CoreError> {
    if app.is_owned_by(owner_id) {
        Ok(())
    } else {
        Err(CoreError::PermissionDenied(format!(
            "application {} is not owned by {owner_id}",
            app.application_id
        )))
    }
}

/// Specs whose `(name, namespace)` is not among `members`, first occurrence
/// only, in submission order.
fn missing_services<'a>(
    requested: &'a [MicroserviceSpec],
    members: &[Job],
) -> Vec<&'a MicroserviceSpec> {
    let mut seen: HashSet<(&str, &str)> = members.iter().map(Job::identity).collect();
    requested
        .iter()
        .filter(|spec| seen.insert(spec.identity()))
        .collect()
}
