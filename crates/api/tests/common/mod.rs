#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sysmgr_core::application::Application;
use sysmgr_core::job::{DeploymentContext, Job};
use sysmgr_core::lifecycle::JobLifecycleManager;
use sysmgr_core::notifier::{DeploymentNotifier, NotifierError};
use sysmgr_core::store::{InMemoryApplicationRegistry, InMemoryJobStore, Stores};
use sysmgr_core::validation::NamingPolicy;
use tower::ServiceExt;

use sysmgr_api::config::{ServerConfig, StoreBackend};
use sysmgr_api::middleware::owner::OWNER_HEADER;
use sysmgr_api::router::build_app_router;
use sysmgr_api::state::AppState;

pub const OWNER: &str = "Admin";

/// Build a test `ServerConfig` for the in-memory backend.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        request_timeout_secs: 30,
        store_backend: StoreBackend::Memory,
        database_url: None,
        naming: NamingPolicy::default(),
        notifier_url: "http://localhost:10004".to_string(),
        notifier_timeout_secs: 10,
        queue_capacity: 16,
    }
}

/// Deployment notifier that remembers every call.
#[derive(Default)]
pub struct RecordingNotifier {
    pub deployed: Mutex<Vec<Job>>,
    pub undeployed: Mutex<Vec<Job>>,
}

#[async_trait]
impl DeploymentNotifier for RecordingNotifier {
    async fn notify_deploy(&self, job: &Job, _: &DeploymentContext) -> Result<(), NotifierError> {
        self.deployed.lock().unwrap().push(job.clone());
        Ok(())
    }

    async fn notify_undeploy(&self, job: &Job) -> Result<(), NotifierError> {
        self.undeployed.lock().unwrap().push(job.clone());
        Ok(())
    }
}

/// Router plus handles on the stores behind it.
pub struct TestApp {
    pub router: Router,
    pub applications: Arc<InMemoryApplicationRegistry>,
    pub jobs: Arc<InMemoryJobStore>,
    pub notifier: Arc<RecordingNotifier>,
}

impl TestApp {
    /// Register an application owned by [`OWNER`].
    pub async fn seed_app(&self, name: &str, namespace: &str) -> Application {
        self.applications.create(OWNER, name, namespace).await.unwrap()
    }

    pub fn app(&self) -> Router {
        self.router.clone()
    }
}

/// Build the full application router over in-memory stores, with the same
/// middleware stack as production.
pub fn build_test_app() -> TestApp {
    let config = test_config();
    let (stores, applications, jobs): (Stores, _, _) = Stores::in_memory();
    let notifier = Arc::new(RecordingNotifier::default());

    let lifecycle = JobLifecycleManager::new(stores, notifier.clone(), config.naming);
    let state = AppState {
        lifecycle: Arc::new(lifecycle),
        config: Arc::new(config.clone()),
        db: None,
    };

    TestApp {
        router: build_app_router(state, &config),
        applications,
        jobs,
        notifier,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

fn request(method: &str, uri: &str, owner: Option<&str>) -> axum::http::request::Builder {
    let builder = Request::builder().method(method).uri(uri);
    match owner {
        Some(owner) => builder.header(OWNER_HEADER, owner),
        None => builder,
    }
}

pub async fn get(app: Router, uri: &str, owner: Option<&str>) -> Response<Body> {
    let req = request("GET", uri, owner).body(Body::empty()).unwrap();
    app.oneshot(req).await.unwrap()
}

pub async fn delete(app: Router, uri: &str, owner: Option<&str>) -> Response<Body> {
    let req = request("DELETE", uri, owner).body(Body::empty()).unwrap();
    app.oneshot(req).await.unwrap()
}

pub async fn post_json(
    app: Router,
    uri: &str,
    owner: Option<&str>,
    body: serde_json::Value,
) -> Response<Body> {
    let req = request("POST", uri, owner)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();
    app.oneshot(req).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

pub fn microservice(name: &str, namespace: &str) -> serde_json::Value {
    serde_json::json!({
        "microservice_name": name,
        "microservice_namespace": namespace,
        "virtualization": "container",
        "code": "docker.io/library/nginx:latest",
        "memory": 100,
        "vcpus": 1,
    })
}

/// SLA addressing `app` by id.
pub fn sla_for(app: &Application, services: &[serde_json::Value]) -> serde_json::Value {
    serde_json::json!({
        "sla_version": "v2.0",
        "customer_id": "Admin",
        "applications": [{
            "applicationID": app.application_id.to_string(),
            "application_name": app.application_name,
            "application_namespace": app.application_namespace,
            "microservices": services,
        }],
    })
}
