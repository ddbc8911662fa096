//! Document storage behind the in-memory provider.
//!
//! A [`StorageProvider`] keeps serialized resources as JSON documents, grouped
//! by resource type and keyed by identifier. It knows nothing about SCIM:
//! identifiers, `meta`, uniqueness and filtering are decided by the provider
//! that owns it. Writing to a key either inserts or overwrites; the provider
//! tells create from replace.
//!
//! ```rust
//! use scim_core::storage::{InMemoryStorage, StorageKey, StoragePrefix, StorageProvider};
//! use serde_json::json;
//!
//! # tokio_test::block_on(async {
//! let storage = InMemoryStorage::new();
//! storage
//!     .put(StorageKey::new("User", "2819c223"), json!({"userName": "bjensen"}))
//!     .await
//!     .unwrap();
//!
//! let found = storage
//!     .find_by_attribute(&StoragePrefix::new("User"), "userName", "BJENSEN", false)
//!     .await
//!     .unwrap();
//! assert_eq!(found[0].0.resource_id(), "2819c223");
//! # });
//! ```

pub mod errors;
pub mod in_memory;

pub use errors::StorageError;
pub use in_memory::InMemoryStorage;

use serde_json::Value;
use std::fmt;
use std::future::Future;

/// Address of one stored document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageKey {
    resource_type: String,
    resource_id: String,
}

impl StorageKey {
    pub fn new(resource_type: impl Into<String>, resource_id: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            resource_id: resource_id.into(),
        }
    }

    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    pub fn resource_id(&self) -> &str {
        &self.resource_id
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.resource_type, self.resource_id)
    }
}

/// Every document of one resource type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePrefix {
    resource_type: String,
}

impl StoragePrefix {
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
        }
    }

    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    /// The key of `resource_id` under this prefix.
    pub fn key(&self, resource_id: impl Into<String>) -> StorageKey {
        StorageKey::new(self.resource_type.clone(), resource_id)
    }
}

/// Persistence of JSON documents.
///
/// Listings and lookups return documents ordered by resource identifier.
/// Missing documents are reported through `Option`/`bool`, never as errors.
pub trait StorageProvider: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Insert or overwrite the document at `key`.
    fn put(
        &self,
        key: StorageKey,
        data: Value,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    fn get(
        &self,
        key: StorageKey,
    ) -> impl Future<Output = Result<Option<Value>, Self::Error>> + Send;

    /// Remove the document at `key`. `true` if there was one.
    fn delete(&self, key: StorageKey) -> impl Future<Output = Result<bool, Self::Error>> + Send;

    /// Every document under `prefix`.
    fn list(
        &self,
        prefix: &StoragePrefix,
    ) -> impl Future<Output = Result<Vec<(StorageKey, Value)>, Self::Error>> + Send;

    /// Documents under `prefix` whose scalar at the dotted `attribute` path
    /// equals `value`. Array elements are addressed by index, as in
    /// `emails.0.value`.
    fn find_by_attribute(
        &self,
        prefix: &StoragePrefix,
        attribute: &str,
        value: &str,
        case_exact: bool,
    ) -> impl Future<Output = Result<Vec<(StorageKey, Value)>, Self::Error>> + Send;

    /// Drop every document.
    fn clear(&self) -> impl Future<Output = Result<(), Self::Error>> + Send;
}
