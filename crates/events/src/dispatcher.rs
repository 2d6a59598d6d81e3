//! Queue between the lifecycle manager and the deployment subsystem.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sysmgr_core::job::{DeploymentContext, Job};
use sysmgr_core::notifier::{DeploymentNotifier, NotifierError};
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio_util::sync::CancellationToken;

/// Default number of notifications that may wait for the worker.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// Default bound on a single downstream notification.
pub const DEFAULT_NOTIFY_TIMEOUT: Duration = Duration::from_secs(10);

/// One pending notification.
#[derive(Debug, Clone)]
pub enum DeploymentTask {
    Deploy {
        job: Job,
        context: DeploymentContext,
    },
    Undeploy {
        job: Job,
    },
}

impl DeploymentTask {
    fn kind(&self) -> &'static str {
        match self {
            DeploymentTask::Deploy { .. } => "deploy",
            DeploymentTask::Undeploy { .. } => "undeploy",
        }
    }

    fn job(&self) -> &Job {
        match self {
            DeploymentTask::Deploy { job, .. } | DeploymentTask::Undeploy { job } => job,
        }
    }
}

/// Enqueuing [`DeploymentNotifier`].
///
/// Returns as soon as the task is queued. A full or closed queue is reported
/// as [`NotifierError::Unavailable`]; nothing is retried.
#[derive(Debug, Clone)]
pub struct DeploymentDispatcher {
    sender: mpsc::Sender<DeploymentTask>,
}

impl DeploymentDispatcher {
    /// Create a dispatcher and the receiving end for its worker.
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<DeploymentTask>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, receiver)
    }

    fn enqueue(&self, task: DeploymentTask) -> Result<(), NotifierError> {
        self.sender.try_send(task).map_err(|e| match e {
            TrySendError::Full(_) => NotifierError::Unavailable("deployment queue is full".into()),
            TrySendError::Closed(_) => {
                NotifierError::Unavailable("deployment queue is closed".into())
            }
        })
    }
}

#[async_trait]
impl DeploymentNotifier for DeploymentDispatcher {
    async fn notify_deploy(
        &self,
        job: &Job,
        context: &DeploymentContext,
    ) -> Result<(), NotifierError> {
        self.enqueue(DeploymentTask::Deploy {
            job: job.clone(),
            context: context.clone(),
        })
    }

    async fn notify_undeploy(&self, job: &Job) -> Result<(), NotifierError> {
        self.enqueue(DeploymentTask::Undeploy { job: job.clone() })
    }
}

/// Drains a dispatcher queue into a downstream notifier.
pub struct DeploymentWorker {
    notifier: Arc<dyn DeploymentNotifier>,
    timeout: Duration,
}

impl DeploymentWorker {
    pub fn new(notifier: Arc<dyn DeploymentNotifier>, timeout: Duration) -> Self {
        Self { notifier, timeout }
    }

    /// Process tasks until `cancel` fires or every dispatcher is dropped.
    ///
    /// Failures and timeouts are logged and the task is dropped.
    pub async fn run(
        self,
        mut receiver: mpsc::Receiver<DeploymentTask>,
        cancel: CancellationToken,
    ) {
        tracing::info!(
            timeout_ms = self.timeout.as_millis() as u64,
            "Deployment worker started",
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Deployment worker stopping");
                    break;
                }
                task = receiver.recv() => match task {
                    Some(task) => self.handle(task).await,
                    None => {
                        tracing::info!("Deployment queue closed, worker stopping");
                        break;
                    }
                },
            }
        }
    }

    async fn handle(&self, task: DeploymentTask) {
        let call = async {
            match &task {
                DeploymentTask::Deploy { job, context } => {
                    self.notifier.notify_deploy(job, context).await
                }
                DeploymentTask::Undeploy { job } => self.notifier.notify_undeploy(job).await,
            }
        };
        let result = match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(NotifierError::Timeout),
        };

        let job = task.job();
        match result {
            Ok(()) => tracing::debug!(
                kind = task.kind(),
                job_id = %job.job_id,
                job_name = %job.job_name,
                "Deployment notification delivered",
            ),
            Err(e) => tracing::warn!(
                kind = task.kind(),
                job_id = %job.job_id,
                job_name = %job.job_name,
                error = %e,
                "Deployment notification failed",
            ),
        }
    }
}
