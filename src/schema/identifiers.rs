//! Well-known schema URNs.

/// Core User resource schema.
pub const CORE2_USER: &str = "urn:ietf:params:scim:schemas:core:2.0:User";
/// Enterprise User extension schema.
pub const CORE2_ENTERPRISE_USER: &str =
    "urn:ietf:params:scim:schemas:extension:enterprise:2.0:User";
/// Core Group resource schema.
pub const CORE2_GROUP: &str = "urn:ietf:params:scim:schemas:core:2.0:Group";
/// ResourceType document schema.
pub const CORE2_RESOURCE_TYPE: &str = "urn:ietf:params:scim:schemas:core:2.0:ResourceType";
/// Schema document schema.
pub const CORE2_SCHEMA: &str = "urn:ietf:params:scim:schemas:core:2.0:Schema";
/// ServiceProviderConfig document schema.
pub const CORE2_SERVICE_CONFIGURATION: &str =
    "urn:ietf:params:scim:schemas:core:2.0:ServiceProviderConfig";

/// Protocol message schemas.
pub const LIST_RESPONSE: &str = "urn:ietf:params:scim:api:messages:2.0:ListResponse";
pub const PATCH_OPERATION: &str = "urn:ietf:params:scim:api:messages:2.0:PatchOp";
pub const BULK_REQUEST: &str = "urn:ietf:params:scim:api:messages:2.0:BulkRequest";
pub const BULK_RESPONSE: &str = "urn:ietf:params:scim:api:messages:2.0:BulkResponse";
pub const ERROR: &str = "urn:ietf:params:scim:api:messages:2.0:Error";

/// Resource type names used in `meta.resourceType`.
pub mod types {
    pub const USER: &str = "User";
    pub const GROUP: &str = "Group";
    pub const RESOURCE_TYPE: &str = "ResourceType";
    pub const SCHEMA: &str = "Schema";
    pub const SERVICE_PROVIDER_CONFIGURATION: &str = "ServiceProviderConfig";
}
