//! HTTP delivery to the deployment subsystem.
//!
//! [`HttpDeploymentNotifier`] posts new jobs to
//! `{base}/api/v1/deployments` and removes them with
//! `DELETE {base}/api/v1/deployments/{job_id}`. Each call is a single
//! attempt; retries are the caller's concern.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use sysmgr_core::job::{DeploymentContext, Job};
use sysmgr_core::notifier::{DeploymentNotifier, NotifierError};

/// Body of a deploy request.
#[derive(Debug, Serialize)]
struct DeployRequest<'a> {
    job: &'a Job,
    context: &'a DeploymentContext,
}

// ---------------------------------------------------------------------------
// HttpDeploymentNotifier
// ---------------------------------------------------------------------------

pub struct HttpDeploymentNotifier {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDeploymentNotifier {
    /// Create a notifier for the deployment subsystem at `base_url`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build reqwest HTTP client");
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn deployments_url(&self) -> String {
        format!("{}/api/v1/deployments", self.base_url)
    }

    async fn check(request: reqwest::RequestBuilder) -> Result<(), NotifierError> {
        let response = request.send().await.map_err(request_error)?;
        if !response.status().is_success() {
            return Err(NotifierError::Rejected(response.status().as_u16()));
        }
        Ok(())
    }
}

#[async_trait]
impl DeploymentNotifier for HttpDeploymentNotifier {
    async fn notify_deploy(
        &self,
        job: &Job,
        context: &DeploymentContext,
    ) -> Result<(), NotifierError> {
        let body = DeployRequest { job, context };
        Self::check(self.client.post(self.deployments_url()).json(&body)).await
    }

    async fn notify_undeploy(&self, job: &Job) -> Result<(), NotifierError> {
        let url = format!("{}/{}", self.deployments_url(), job.job_id);
        Self::check(self.client.delete(url)).await
    }
}

fn request_error(err: reqwest::Error) -> NotifierError {
    if err.is_timeout() {
        NotifierError::Timeout
    } else {
        NotifierError::Unavailable(err.to_string())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
