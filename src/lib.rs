//! SCIM 2.0 protocol core for Rust.
//!
//! Provides the typed resource and schema model, filter and attribute path
//! expressions, the patch engine, bulk request processing and resource
//! addressing, with an async provider contract for pluggable backends.
//!
//! # Core Components
//!
//! - [`Provider`] - Trait for implementing resource backends
//! - [`ProviderAdapter`](providers::ProviderAdapter) - JSON request handling on top of a provider
//! - [`BulkProcessor`](bulk::BulkProcessor) - Ordered execution of bulk requests
//! - [`InMemoryProvider`](providers::InMemoryProvider) - Reference backend
//!
//! # Quick Start
//!
//! ```rust
//! use scim_core::protocol::{RequestContext, ResourceQuery};
//! use scim_core::providers::{InMemoryProvider, ProviderAdapter};
//! use scim_core::resource::Core2User;
//! use serde_json::json;
//!
//! # tokio_test::block_on(async {
//! let provider = InMemoryProvider::new();
//! let users = ProviderAdapter::<Core2User, _>::new(&provider);
//! let context = RequestContext::new("quick-start");
//!
//! let created = users
//!     .create(json!({"userName": "bjensen", "externalId": "bjensen"}), &context)
//!     .await
//!     .unwrap();
//! let id = created["id"].as_str().unwrap();
//!
//! let query = ResourceQuery::from_query_string("attributes=userName").unwrap();
//! let fetched = users.retrieve(id, &query, &context).await.unwrap();
//! assert_eq!(fetched["userName"], "bjensen");
//! # });
//! ```

pub mod addressing;
pub mod bulk;
pub mod error;
pub mod filter;
pub mod patch;
pub mod protocol;
pub mod providers;
pub mod resource;
pub mod schema;
pub mod storage;

// Re-export commonly used types for convenience
pub use error::{ErrorKind, ScimError, ScimResult, ScimType};
pub use filter::{Filter, FilterError};
pub use patch::{PatchError, PatchOperation, PatchRequest};
pub use protocol::{ErrorResponse, QueryResponse, RequestContext, ResourceQuery};
pub use providers::{Provider, ProviderError, ScimProvider, ServiceCatalog};
pub use resource::{Core2Group, Core2User, Resource, ResourceKind};
pub use schema::{ServiceConfiguration, TypeScheme};
