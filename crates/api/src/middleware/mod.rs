//! Request extractors.
//!
//! - [`owner::OwnerId`] -- Caller identity forwarded by the authenticating gateway.

pub mod owner;
