//! Errors raised by storage backends.

use thiserror::Error;

/// A storage backend failure.
///
/// Absence is not an error at this level; it is reported through the
/// `Option`/`bool` results of [`StorageProvider`](super::StorageProvider).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// The key or document cannot be stored
    #[error("Invalid data: {message}")]
    InvalidData { message: String },

    #[error("Internal storage error: {message}")]
    Internal { message: String },
}

impl StorageError {
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            StorageError::invalid_data("a User needs an identifier to be stored").to_string(),
            "Invalid data: a User needs an identifier to be stored"
        );
        assert_eq!(
            StorageError::internal("lock poisoned").to_string(),
            "Internal storage error: lock poisoned"
        );
    }
}
