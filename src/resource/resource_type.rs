//! Resource type documents served from `/ResourceTypes`.

use crate::resource::{Metadata, Resource};
use crate::schema::identifiers;
use serde::{Deserialize, Serialize};

/// Describes one kind of resource the service provider exposes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Core2ResourceType {
    #[serde(flatten)]
    pub resource: Resource,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Collection endpoint relative to the base URI, e.g. `/Users`
    pub endpoint: String,
    /// Declaring schema URN of resources of this type
    pub schema: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    schema_extensions: Vec<SchemaExtensionReference>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaExtensionReference {
    pub schema: String,
    pub required: bool,
}

impl Core2ResourceType {
    pub fn new(
        name: impl Into<String>,
        endpoint: impl Into<String>,
        schema: impl Into<String>,
    ) -> Self {
        let name = name.into();
        let mut resource = Resource::new(identifiers::CORE2_RESOURCE_TYPE);
        resource.id = Some(name.clone());
        resource.meta = Some(Metadata::new(identifiers::types::RESOURCE_TYPE));
        Self {
            resource,
            name,
            description: None,
            endpoint: endpoint.into(),
            schema: schema.into(),
            schema_extensions: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_schema_extension(mut self, schema: &str, required: bool) -> Self {
        self.add_schema_extension(schema, required);
        self
    }

    /// Declare an extension schema. Returns `false` when already declared.
    pub fn add_schema_extension(&mut self, schema: &str, required: bool) -> bool {
        if self
            .schema_extensions
            .iter()
            .any(|existing| existing.schema.eq_ignore_ascii_case(schema))
        {
            return false;
        }
        self.schema_extensions.push(SchemaExtensionReference {
            schema: schema.to_string(),
            required,
        });
        true
    }

    pub fn schema_extensions(&self) -> &[SchemaExtensionReference] {
        &self.schema_extensions
    }
}
