//! Naming-policy validation engine.
//!
//! Pure checks run against every new microservice specification before any
//! state is touched. A batch is accepted only if every spec in it passes.

use validator::ValidateLength;

use crate::sla::MicroserviceSpec;

/// Default maximum length, in characters, of a microservice name.
pub const DEFAULT_MAX_NAME_LEN: usize = 10;

/// Default maximum length, in characters, of a microservice namespace.
pub const DEFAULT_MAX_NAMESPACE_LEN: usize = 10;

/// Configured limits for microservice identity fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamingPolicy {
    pub max_name_len: usize,
    pub max_namespace_len: usize,
}

impl Default for NamingPolicy {
    fn default() -> Self {
        Self {
            max_name_len: DEFAULT_MAX_NAME_LEN,
            max_namespace_len: DEFAULT_MAX_NAMESPACE_LEN,
        }
    }
}

/// A naming-policy violation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpecViolation {
    #[error("name too long: '{name}' has {len} characters, maximum is {max}")]
    NameTooLong { name: String, len: usize, max: usize },

    #[error("namespace too long: '{namespace}' has {len} characters, maximum is {max}")]
    NamespaceTooLong {
        namespace: String,
        len: usize,
        max: usize,
    },
}

/// Check one specification against the policy.
pub fn validate(policy: &NamingPolicy, spec: &MicroserviceSpec) -> Result<(), SpecViolation> {
    let max_name = Some(policy.max_name_len as u64);
    if !spec.microservice_name.validate_length(None, max_name, None) {
        return Err(SpecViolation::NameTooLong {
            name: spec.microservice_name.clone(),
            len: spec.microservice_name.chars().count(),
            max: policy.max_name_len,
        });
    }
    let max_namespace = Some(policy.max_namespace_len as u64);
    if !spec
        .microservice_namespace
        .validate_length(None, max_namespace, None)
    {
        return Err(SpecViolation::NamespaceTooLong {
            namespace: spec.microservice_namespace.clone(),
            len: spec.microservice_namespace.chars().count(),
            max: policy.max_namespace_len,
        });
    }
    Ok(())
}

/// Check every specification of a batch, stopping at the first violation.
pub fn validate_batch<'a, I>(policy: &NamingPolicy, specs: I) -> Result<(), SpecViolation>
where
    I: IntoIterator<Item = &'a MicroserviceSpec>,
{
    specs
        .into_iter()
        .try_for_each(|spec| validate(policy, spec))
}
