//! Domain core of the system manager.
//!
//! Holds the SLA descriptor, the naming-policy validation engine, the job
//! record builder, the store and notifier seams, and the
//! [`JobLifecycleManager`](lifecycle::JobLifecycleManager) that ties them
//! together. Nothing here talks to a database or the network directly.

pub mod application;
pub mod error;
pub mod job;
pub mod lifecycle;
pub mod locks;
pub mod notifier;
pub mod sla;
pub mod store;
pub mod types;
pub mod validation;
