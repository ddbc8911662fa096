//! Protocol envelopes and request plumbing shared by providers and the bulk
//! processor.

pub mod context;
pub mod error_response;
pub mod query;

pub use context::RequestContext;
pub use error_response::ErrorResponse;
pub use query::{PaginationParameters, QueryResponse, ResourceQuery};

/// Media type and collection names of the SCIM HTTP surface.
pub struct ProtocolConstants;

impl ProtocolConstants {
    pub const CONTENT_TYPE: &'static str = "application/scim+json";
    pub const PATH_USERS: &'static str = "Users";
    pub const PATH_GROUPS: &'static str = "Groups";
    pub const PATH_BULK: &'static str = "Bulk";
    pub const PATH_SCHEMAS: &'static str = "Schemas";
    pub const PATH_RESOURCE_TYPES: &'static str = "ResourceTypes";
    pub const PATH_SERVICE_PROVIDER_CONFIGURATION: &'static str = "ServiceProviderConfig";
}
