//! Error types for resource provider implementations.
//!
//! [`ProviderError`] is what the bundled providers report. It converts into
//! [`ScimError`](crate::ScimError), which fixes the HTTP status and `scimType`
//! each case is answered with.

use crate::filter::FilterError;
use crate::patch::PatchError;
use crate::storage::StorageError;
use thiserror::Error;

/// Errors that can occur during resource provider operations.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{resource_type} '{id}' not found")]
    ResourceNotFound {
        /// The type of resource that was not found
        resource_type: String,
        /// The ID of the resource that was not found
        id: String,
    },

    #[error("{resource_type} with {attribute} '{value}' already exists")]
    DuplicateAttribute {
        /// The type of resource with duplicate attribute
        resource_type: String,
        /// The name of the duplicate attribute
        attribute: String,
        /// The duplicate value
        value: String,
    },

    #[error("{resource_type} identifiers are assigned by the service provider")]
    IdentifierNotAllowed { resource_type: String },

    #[error("{resource_type} has no identifier")]
    MissingIdentifier { resource_type: String },

    #[error("{resource_type} requires '{attribute}'")]
    MissingAttribute {
        resource_type: String,
        attribute: String,
    },

    #[error("Invalid resource data: {message}")]
    InvalidData { message: String },

    #[error("{operation} is not supported by this provider")]
    NotImplemented { operation: String },

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Patch(#[from] PatchError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ProviderError {
    pub fn not_found(resource_type: &str, id: &str) -> Self {
        Self::ResourceNotFound {
            resource_type: resource_type.to_string(),
            id: id.to_string(),
        }
    }

    pub fn not_implemented(operation: &str) -> Self {
        Self::NotImplemented {
            operation: operation.to_string(),
        }
    }

    /// Wrap a failure of a storage backend whose error type is not
    /// [`StorageError`].
    pub fn storage(error: impl std::fmt::Display) -> Self {
        Self::Storage(StorageError::internal(error.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, ScimError};

    #[test]
    fn test_messages() {
        assert_eq!(
            ProviderError::not_found("User", "42").to_string(),
            "User '42' not found"
        );
        assert_eq!(
            ProviderError::MissingAttribute {
                resource_type: "User".to_string(),
                attribute: "userName".to_string(),
            }
            .to_string(),
            "User requires 'userName'"
        );
    }

    #[test]
    fn test_status_of_converted_errors() {
        let cases = [
            (ProviderError::not_found("Group", "1"), ErrorKind::NotFound),
            (
                ProviderError::IdentifierNotAllowed {
                    resource_type: "User".to_string(),
                },
                ErrorKind::BadRequest,
            ),
            (ProviderError::not_implemented("update"), ErrorKind::NotImplemented),
            (ProviderError::storage("disk on fire"), ErrorKind::Internal),
        ];

        for (error, kind) in cases {
            assert_eq!(ScimError::from(error).kind(), kind);
        }
    }
}
