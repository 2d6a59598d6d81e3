//! SLA descriptor submitted by users.
//!
//! The wire shape follows the orchestrator's SLA document: one application
//! per descriptor, each carrying an ordered list of microservice
//! specifications. Structural checks (non-empty identity fields, exactly one
//! application) use `validator` derives and run at the API boundary; naming
//! policy limits are the job of [`crate::validation`].

use serde::{Deserialize, Serialize};
use validator::Validate;

/// A complete deployment descriptor.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Sla {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sla_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[validate(length(equal = 1, message = "an SLA must describe exactly one application"), nested)]
    pub applications: Vec<ApplicationDescriptor>,
}

impl Sla {
    /// The application this descriptor targets.
    pub fn application(&self) -> Option<&ApplicationDescriptor> {
        self.applications.first()
    }
}

/// The application section of an SLA.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ApplicationDescriptor {
    /// Registry id of an existing application. When absent the application
    /// is resolved by name and namespace.
    #[serde(
        rename = "applicationID",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub application_id: Option<String>,
    #[validate(length(min = 1))]
    pub application_name: String,
    #[validate(length(min = 1))]
    pub application_namespace: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_desc: Option<String>,
    #[serde(default)]
    #[validate(nested)]
    pub microservices: Vec<MicroserviceSpec>,
}

/// A proposed microservice.
///
/// Only the identity fields are interpreted here. Every other field of the
/// submitted document is kept in `settings` and travels to the job record
/// unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct MicroserviceSpec {
    #[validate(length(min = 1))]
    pub microservice_name: String,
    #[validate(length(min = 1))]
    pub microservice_namespace: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub virtualization: Option<String>,
    /// Image reference or code location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(flatten)]
    pub settings: serde_json::Map<String, serde_json::Value>,
}

impl MicroserviceSpec {
    /// `(name, namespace)` pair used to match a spec against existing jobs.
    pub fn identity(&self) -> (&str, &str) {
        (&self.microservice_name, &self.microservice_namespace)
    }
}
