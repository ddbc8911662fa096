//! Request context threaded through provider and bulk calls.

use uuid::Uuid;

/// Request context for SCIM operations.
///
/// Carries the caller's correlation identifier. It is used for logging only
/// and never changes the outcome of an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    /// Unique identifier for this request
    pub request_id: String,
}

impl RequestContext {
    /// Create a new request context with a specific request ID.
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
        }
    }

    /// Create a new request context with a generated request ID.
    pub fn with_generated_id() -> Self {
        Self::new(Uuid::new_v4().to_string())
    }

    /// Context for a sub-operation of a bulk request.
    pub fn for_bulk_operation(&self, bulk_id: &str) -> Self {
        Self::new(format!("{}/{}", self.request_id, bulk_id))
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::with_generated_id()
    }
}
