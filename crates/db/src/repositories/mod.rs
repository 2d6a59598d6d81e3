//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod application_repo;
pub mod job_repo;

pub use application_repo::ApplicationRepo;
pub use job_repo::JobRepo;
