use crate::store::StoreError;
use crate::validation::SpecViolation;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Invalid microservice specification: {0}")]
    InvalidSpec(#[from] SpecViolation),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Store failure: {0}")]
    Store(#[from] StoreError),
}

impl CoreError {
    /// Status code reported to the caller of a lifecycle operation.
    ///
    /// Invalid specifications are reported as 403, matching the contract
    /// the orchestrator's clients already rely on.
    pub fn status_code(&self) -> u16 {
        match self {
            CoreError::NotFound { .. } => 404,
            CoreError::InvalidSpec(_) => 403,
            CoreError::Validation(_) => 400,
            CoreError::PermissionDenied(_) => 403,
            CoreError::Store(_) => 500,
        }
    }

    pub(crate) fn application_not_found(id: impl ToString) -> Self {
        CoreError::NotFound {
            entity: "Application",
            id: id.to_string(),
        }
    }

    pub(crate) fn job_not_found(id: impl ToString) -> Self {
        CoreError::NotFound {
            entity: "Job",
            id: id.to_string(),
        }
    }
}
