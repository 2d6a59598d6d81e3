//! Seam to the deployment subsystem.
//!
//! Notifications are best effort: the lifecycle manager logs a failed
//! notification and carries on, since the control-plane change it reports
//! has already been committed.

use async_trait::async_trait;

use crate::job::{DeploymentContext, Job};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotifierError {
    /// The notifier could not be reached or its queue refused the task.
    #[error("deployment notifier unavailable: {0}")]
    Unavailable(String),

    /// The deployment subsystem answered with a non-success status.
    #[error("deployment notifier returned HTTP {0}")]
    Rejected(u16),

    #[error("deployment notifier timed out")]
    Timeout,
}

#[async_trait]
pub trait DeploymentNotifier: Send + Sync {
    /// Ask the deployment subsystem to place and start `job`.
    async fn notify_deploy(
        &self,
        job: &Job,
        context: &DeploymentContext,
    ) -> Result<(), NotifierError>;

    /// Ask the deployment subsystem to stop every running instance of `job`.
    async fn notify_undeploy(&self, job: &Job) -> Result<(), NotifierError>;
}
