use uuid::Uuid;

/// Opaque identifier for applications and jobs.
pub type ResourceId = Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Parse a client-supplied identifier.
///
/// Returns `None` for anything that is not a UUID, so callers can treat a
/// malformed id exactly like an id that does not resolve.
pub fn parse_resource_id(raw: &str) -> Option<ResourceId> {
    Uuid::parse_str(raw.trim()).ok()
}
