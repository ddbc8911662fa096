//! The common shape shared by every protocol resource.

use crate::error::ScimResult;
use crate::resource::schemas::Schemas;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Common attributes of RFC 7643 §3.1 carried by every resource.
///
/// Typed resources embed this with `#[serde(flatten)]` so `schemas`, `id`,
/// `externalId` and `meta` sit at the top level of the JSON document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    #[serde(default)]
    pub schemas: Schemas,
    /// Assigned by the service provider on create
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Caller-supplied, opaque to the service provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Metadata>,
}

impl Resource {
    /// Create a resource with its declaring schema already present.
    pub fn new(schema: &str) -> Self {
        Self {
            schemas: Schemas::declared(schema),
            id: None,
            external_id: None,
            meta: None,
        }
    }

    /// Add a schema URN. Adding one already present is a no-op.
    pub fn add_schema(&mut self, uri: &str) -> ScimResult<bool> {
        self.schemas.add(uri)
    }

    /// Case-insensitive schema membership test.
    pub fn is(&self, uri: &str) -> bool {
        self.schemas.contains(uri)
    }

    pub fn identifier(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }
}

/// The `meta` complex attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub resource_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl Metadata {
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            created: None,
            last_modified: None,
            version: None,
            location: None,
        }
    }
}

/// A concrete resource kind served through a provider.
///
/// The generic adapter, the bulk processor and the addressing helpers are
/// written against this trait; [`Core2User`](crate::resource::Core2User) and
/// [`Core2Group`](crate::resource::Core2Group) implement it.
pub trait ResourceKind: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Declaring schema URN
    const SCHEMA: &'static str;
    /// Value of `meta.resourceType`
    const RESOURCE_TYPE: &'static str;
    /// Collection segment used when no schema on the resource resolves
    const BASE_COLLECTION: &'static str;

    fn resource(&self) -> &Resource;

    fn resource_mut(&mut self) -> &mut Resource;

    /// Bring a freshly deserialized value into canonical form.
    ///
    /// The declaring schema is always present afterwards.
    fn normalize(&mut self) {
        self.resource_mut().schemas.ensure(Self::SCHEMA);
    }

    fn identifier(&self) -> Option<&str> {
        self.resource().identifier()
    }
}
