//! Deployment notification plumbing.
//!
//! - [`DeploymentDispatcher`]: the notifier handed to the lifecycle manager.
//!   It only enqueues, so a slow or failing deployment subsystem never holds
//!   up a create or delete call.
//! - [`DeploymentWorker`]: background task draining the queue into a
//!   downstream notifier, one task at a time, under a per-call timeout.
//! - [`delivery`]: downstream notifiers (HTTP).

pub mod delivery;
pub mod dispatcher;

pub use delivery::http::HttpDeploymentNotifier;
pub use dispatcher::{DeploymentDispatcher, DeploymentTask, DeploymentWorker};
