//! SCIM PATCH (RFC 7644 §3.5.2) for typed resources.
//!
//! A [`PatchRequest`] carries an ordered list of [`PatchOperation`]s. Each
//! operation names its target with a parsed [`Path`](crate::filter::Path) and
//! carries its value as a [`PatchValue`], decided when the request is
//! deserialized. Resources implement [`Patchable`] to apply operations to
//! their own fields.
//!
//! Operations are applied strictly in order. A failing operation stops the
//! request, and the operations before it stay applied. Targets a resource does
//! not know are ignored and logged at debug level.
//!
//! ```rust
//! use scim_core::patch::{PatchRequest, Patchable};
//! use scim_core::resource::{Core2Group, Member};
//! use serde_json::json;
//!
//! let mut group = Core2Group::with_display_name("Admins");
//! group.members.push(Member::user("2819c223"));
//!
//! let request: PatchRequest = serde_json::from_value(json!({
//!     "schemas": ["urn:ietf:params:scim:api:messages:2.0:PatchOp"],
//!     "Operations": [
//!         {"op": "Add", "path": "members", "value": [{"value": "902c246b"}]},
//!         {"op": "remove", "path": "members[value eq \"2819c223\"]"}
//!     ]
//! }))
//! .unwrap();
//!
//! group.apply(&request).unwrap();
//! assert_eq!(group.members.len(), 1);
//! assert_eq!(group.members[0].value, "902c246b");
//! ```

mod apply;
mod group;
pub mod operation;
mod user;

pub use operation::{OperationName, OperationValue, PatchOperation, PatchRequest, PatchValue};

use crate::error::ScimType;
use thiserror::Error;

/// A patch operation that cannot be applied to its resolved target.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatchError {
    /// The path is malformed or has the wrong shape for its attribute
    #[error("Invalid patch path '{path}': {message}")]
    InvalidPath { path: String, message: String },

    /// The value is missing, has the wrong shape, or is not allowed
    #[error("Invalid patch value for '{path}': {message}")]
    InvalidValue { path: String, message: String },

    /// The operation needs a target and has none
    #[error("Patch operation '{operation}' has no target")]
    NoTarget { operation: String },
}

impl PatchError {
    pub fn scim_type(&self) -> ScimType {
        match self {
            PatchError::InvalidPath { .. } => ScimType::InvalidPath,
            PatchError::InvalidValue { .. } => ScimType::InvalidValue,
            PatchError::NoTarget { .. } => ScimType::NoTarget,
        }
    }

    pub(crate) fn invalid_path(path: impl ToString, message: impl Into<String>) -> Self {
        PatchError::InvalidPath {
            path: path.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn invalid_value(path: impl ToString, message: impl Into<String>) -> Self {
        PatchError::InvalidValue {
            path: path.to_string(),
            message: message.into(),
        }
    }
}

pub type PatchResult<T> = Result<T, PatchError>;

/// What happened to one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    /// The target was resolved and the operation applied (possibly a no-op)
    Applied,
    /// The target is unknown to the resource or the operation was skipped
    Ignored,
}

/// A resource that PATCH operations can be applied to.
pub trait Patchable {
    /// Apply a single operation.
    fn apply_operation(&mut self, operation: &PatchOperation) -> PatchResult<PatchOutcome>;

    /// Apply every operation of `request` in order, stopping at the first
    /// failure. Returns how many operations were applied rather than ignored.
    fn apply(&mut self, request: &PatchRequest) -> PatchResult<usize> {
        let mut applied = 0;
        for operation in &request.operations {
            if self.apply_operation(operation)? == PatchOutcome::Applied {
                applied += 1;
            }
        }
        Ok(applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scim_types() {
        assert_eq!(
            PatchError::invalid_path("emails[", "unterminated").scim_type(),
            ScimType::InvalidPath
        );
        assert_eq!(
            PatchError::invalid_value("userName", "required").scim_type(),
            ScimType::InvalidValue
        );
        assert_eq!(
            PatchError::NoTarget {
                operation: "remove".to_string()
            }
            .scim_type(),
            ScimType::NoTarget
        );
    }
}
