//! Error types for SCIM protocol operations.
//!
//! Every failure that leaves the crate is a [`ScimError`]. The lower layers
//! ([`FilterError`], [`PatchError`], [`ProviderError`], [`StorageError`]) convert
//! upward with `?`. [`ScimError::kind`] classifies a failure into an
//! [`ErrorKind`], and [`ErrorKind::status`] is the only place an HTTP status code
//! is chosen.

use crate::filter::FilterError;
use crate::patch::PatchError;
use crate::providers::ProviderError;
use crate::storage::StorageError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Main error type for SCIM protocol operations.
#[derive(Debug, thiserror::Error)]
pub enum ScimError {
    /// Request body or parameters are malformed
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    /// A required argument was null or empty
    #[error("Invalid argument '{argument}': {message}")]
    InvalidArgument { argument: String, message: String },

    /// Filter expression could not be parsed or is not supported
    #[error(transparent)]
    Filter(#[from] FilterError),

    /// Patch operation is malformed for its target
    #[error(transparent)]
    Patch(#[from] PatchError),

    /// Attribute value violates the schema
    #[error("Invalid value: {message}")]
    InvalidValue { message: String },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Resource not found errors
    #[error("Resource not found: {resource_type} with ID {id}")]
    ResourceNotFound { resource_type: String, id: String },

    /// Uniqueness or state conflict
    #[error("Resource conflict: {message}")]
    Conflict { message: String },

    /// Schema identifier with no known collection path
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// Bulk request carries more operations than the service accepts
    #[error("Bulk request has {count} operations, the maximum is {maximum}")]
    TooManyOperations { count: usize, maximum: usize },

    /// Capability not offered by the backing provider
    #[error("Operation '{operation}' is not implemented")]
    NotImplemented { operation: String },

    /// Resource is not in a state the operation can work with
    #[error("Invalid resource: {message}")]
    InvalidResource { message: String },

    /// Storage layer failure
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Internal server errors
    #[error("Internal server error: {message}")]
    Internal { message: String },
}

/// Classification of a [`ScimError`] used to pick the response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    BadRequest,
    InvalidFilter,
    NotFound,
    Conflict,
    PayloadTooLarge,
    NotImplemented,
    Internal,
}

impl ErrorKind {
    /// HTTP status code for this kind of failure.
    pub fn status(self) -> u16 {
        match self {
            ErrorKind::BadRequest | ErrorKind::InvalidFilter => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::Conflict => 409,
            ErrorKind::PayloadTooLarge => 413,
            ErrorKind::Internal => 500,
            ErrorKind::NotImplemented => 501,
        }
    }
}

/// The `scimType` discriminator of RFC 7644 §3.12.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScimType {
    InvalidFilter,
    TooMany,
    Uniqueness,
    Mutability,
    InvalidSyntax,
    InvalidPath,
    NoTarget,
    InvalidValue,
    InvalidVers,
    Sensitive,
}

impl fmt::Display for ScimType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScimType::InvalidFilter => "invalidFilter",
            ScimType::TooMany => "tooMany",
            ScimType::Uniqueness => "uniqueness",
            ScimType::Mutability => "mutability",
            ScimType::InvalidSyntax => "invalidSyntax",
            ScimType::InvalidPath => "invalidPath",
            ScimType::NoTarget => "noTarget",
            ScimType::InvalidValue => "invalidValue",
            ScimType::InvalidVers => "invalidVers",
            ScimType::Sensitive => "sensitive",
        };
        f.write_str(name)
    }
}

const GENERIC_INTERNAL_DETAIL: &str = "An internal error occurred while processing the request.";

impl ScimError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ScimError::Filter(_) => ErrorKind::InvalidFilter,
            ScimError::InvalidRequest { .. }
            | ScimError::InvalidArgument { .. }
            | ScimError::Patch(_)
            | ScimError::InvalidValue { .. }
            | ScimError::Json(_)
            | ScimError::UnsupportedType(_) => ErrorKind::BadRequest,
            ScimError::ResourceNotFound { .. } => ErrorKind::NotFound,
            ScimError::Conflict { .. } => ErrorKind::Conflict,
            ScimError::TooManyOperations { .. } => ErrorKind::PayloadTooLarge,
            ScimError::NotImplemented { .. } => ErrorKind::NotImplemented,
            ScimError::InvalidResource { .. }
            | ScimError::Storage(_)
            | ScimError::Internal { .. } => ErrorKind::Internal,
        }
    }

    /// HTTP status code for this error.
    pub fn status(&self) -> u16 {
        self.kind().status()
    }

    /// The `scimType` discriminator, when one applies.
    pub fn scim_type(&self) -> Option<ScimType> {
        match self {
            ScimError::Filter(_) => Some(ScimType::InvalidFilter),
            ScimError::Patch(error) => Some(error.scim_type()),
            ScimError::InvalidValue { .. } => Some(ScimType::InvalidValue),
            ScimError::Json(_) => Some(ScimType::InvalidSyntax),
            ScimError::Conflict { .. } => Some(ScimType::Uniqueness),
            ScimError::TooManyOperations { .. } => Some(ScimType::TooMany),
            _ => None,
        }
    }

    /// Caller-facing detail text. Internal faults never expose their message.
    pub fn detail(&self) -> String {
        match self.kind() {
            ErrorKind::Internal => GENERIC_INTERNAL_DETAIL.to_string(),
            _ => self.to_string(),
        }
    }
}

// Convenience methods for creating common errors
impl ScimError {
    /// Create a resource not found error
    pub fn resource_not_found(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::ResourceNotFound {
            resource_type: resource_type.into(),
            id: id.into(),
        }
    }

    /// Create an internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Create an invalid request error
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(argument: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            argument: argument.into(),
            message: message.into(),
        }
    }

    /// Create a conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Create a not implemented error
    pub fn not_implemented(operation: impl Into<String>) -> Self {
        Self::NotImplemented {
            operation: operation.into(),
        }
    }
}

impl From<ProviderError> for ScimError {
    fn from(error: ProviderError) -> Self {
        match error {
            ProviderError::ResourceNotFound { resource_type, id } => {
                ScimError::ResourceNotFound { resource_type, id }
            }
            error @ ProviderError::DuplicateAttribute { .. } => {
                ScimError::conflict(error.to_string())
            }
            error @ (ProviderError::IdentifierNotAllowed { .. }
            | ProviderError::MissingIdentifier { .. }
            | ProviderError::MissingAttribute { .. }
            | ProviderError::InvalidData { .. }) => ScimError::invalid_request(error.to_string()),
            ProviderError::NotImplemented { operation } => ScimError::NotImplemented { operation },
            ProviderError::Filter(error) => ScimError::Filter(error),
            ProviderError::Patch(error) => ScimError::Patch(error),
            ProviderError::Storage(error) => ScimError::Storage(error),
            ProviderError::Serialization(error) => ScimError::Json(error),
        }
    }
}

// Result type aliases for convenience
pub type ScimResult<T> = Result<T, ScimError>;
