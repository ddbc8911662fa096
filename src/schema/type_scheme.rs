//! Schema documents served from `/Schemas`.

use crate::error::{ScimError, ScimResult};
use crate::resource::{Metadata, Resource};
use crate::schema::attribute::{AttributeScheme, insert_attribute};
use crate::schema::identifiers;
use serde::{Deserialize, Serialize};

/// A named, described collection of attribute definitions.
///
/// A schema document is itself a resource whose declaring schema is the
/// `Schema` URN and whose `id` is the URN it describes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeScheme {
    #[serde(flatten)]
    pub resource: Resource,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    attributes: Vec<AttributeScheme>,
}

impl TypeScheme {
    /// Create an empty schema document for `uri`.
    pub fn new(uri: &str, name: impl Into<String>) -> ScimResult<Self> {
        if uri.trim().is_empty() {
            return Err(ScimError::invalid_argument(
                "schemaIdentifier",
                "schema identifier must not be empty",
            ));
        }
        Ok(Self::builtin(uri, name))
    }

    pub(crate) fn builtin(uri: &str, name: impl Into<String>) -> Self {
        let mut resource = Resource::new(identifiers::CORE2_SCHEMA);
        resource.id = Some(uri.to_string());
        resource.meta = Some(Metadata::new(identifiers::types::SCHEMA));
        Self {
            resource,
            name: name.into(),
            description: None,
            attributes: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub(crate) fn with_attribute(mut self, attribute: AttributeScheme) -> Self {
        insert_attribute(&mut self.attributes, attribute);
        self
    }

    /// Add an attribute. Returns `false` when one with the same name exists.
    pub fn add_attribute(&mut self, attribute: AttributeScheme) -> ScimResult<bool> {
        if attribute.name.trim().is_empty() {
            return Err(ScimError::invalid_argument(
                "attribute",
                "attribute name must not be empty",
            ));
        }
        Ok(insert_attribute(&mut self.attributes, attribute))
    }

    /// The schema URN this document describes.
    pub fn identifier(&self) -> &str {
        self.resource.id.as_deref().unwrap_or_default()
    }

    pub fn attributes(&self) -> &[AttributeScheme] {
        &self.attributes
    }

    /// Find a top-level attribute by case-insensitive name.
    pub fn attribute(&self, name: &str) -> Option<&AttributeScheme> {
        self.attributes
            .iter()
            .find(|attribute| attribute.name.eq_ignore_ascii_case(name))
    }

    /// Resolve a dotted path such as `name.givenName` or `meta.lastModified`.
    pub fn resolve(&self, path: &str) -> Option<&AttributeScheme> {
        let mut segments = path.split('.');
        let mut current = self.attribute(segments.next()?)?;
        for segment in segments {
            current = current.sub_attribute(segment)?;
        }
        Some(current)
    }
}
