//! Bulk requests (RFC 7644 §3.7).
//!
//! A [`BulkRequest`] is validated operation by operation and then executed
//! in order by a [`BulkProcessor`]. Operations may refer to resources created
//! earlier in the same request with `bulkId:<id>`; see [`reference`].
//!
//! ```rust
//! use scim_core::bulk::{BulkRequest, BulkRequestOperation};
//! use scim_core::protocol::RequestContext;
//! use scim_core::providers::{InMemoryProvider, ScimProvider};
//! use serde_json::json;
//!
//! # tokio_test::block_on(async {
//! let provider = InMemoryProvider::new();
//! let request = BulkRequest::new()
//!     .with_operation(BulkRequestOperation::post("/Users", json!({"userName": "bjensen"})).with_bulk_id("1"))
//!     .unwrap();
//!
//! let response = provider.process(request, &RequestContext::new("doc")).await.unwrap();
//! assert_eq!(response.operations[0].status, 201);
//! # });
//! ```

pub mod context;
pub mod operation;
pub mod processor;
pub mod reference;

pub use context::{BulkOperationContext, Collection, OperationRequest, OperationState};
pub use operation::{
    BulkMethod, BulkRequest, BulkRequestOperation, BulkResponse, BulkResponseOperation,
};
pub use processor::BulkProcessor;
pub use reference::{BulkIdentifiers, UnresolvedReference};
