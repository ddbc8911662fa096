//! Attribute metadata as described by RFC 7643 §7.

use crate::error::{ScimError, ScimResult};
use serde::{Deserialize, Serialize};

/// Definition of one attribute of a schema.
///
/// Sub-attributes, canonical values and reference types are sets: adding an
/// entry that is already present (compared case-insensitively) is a no-op.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeScheme {
    /// Attribute name
    pub name: String,
    /// Data type of the attribute
    #[serde(rename = "type")]
    pub data_type: AttributeDataType,
    /// Whether this attribute can have multiple values
    #[serde(rename = "multiValued")]
    pub plural: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether this attribute is required
    #[serde(default)]
    pub required: bool,
    /// Whether string comparison is case-sensitive
    #[serde(default)]
    pub case_exact: bool,
    #[serde(default)]
    pub mutability: Mutability,
    #[serde(default)]
    pub returned: Returned,
    #[serde(default)]
    pub uniqueness: Uniqueness,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    sub_attributes: Vec<AttributeScheme>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    canonical_values: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    reference_types: Vec<String>,
}

impl AttributeScheme {
    /// Create an attribute definition with readWrite mutability, default
    /// returned policy and no uniqueness constraint.
    pub fn new(
        name: impl Into<String>,
        data_type: AttributeDataType,
        plural: bool,
    ) -> ScimResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ScimError::invalid_argument(
                "name",
                "attribute name must not be empty",
            ));
        }
        Ok(Self::builtin(name, data_type, plural))
    }

    pub(crate) fn builtin(
        name: impl Into<String>,
        data_type: AttributeDataType,
        plural: bool,
    ) -> Self {
        Self {
            name: name.into(),
            data_type,
            plural,
            description: None,
            required: false,
            case_exact: false,
            mutability: Mutability::ReadWrite,
            returned: Returned::Default,
            uniqueness: Uniqueness::None,
            sub_attributes: Vec::new(),
            canonical_values: Vec::new(),
            reference_types: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn case_exact(mut self) -> Self {
        self.case_exact = true;
        self
    }

    pub fn with_mutability(mut self, mutability: Mutability) -> Self {
        self.mutability = mutability;
        self
    }

    pub fn with_returned(mut self, returned: Returned) -> Self {
        self.returned = returned;
        self
    }

    pub fn with_uniqueness(mut self, uniqueness: Uniqueness) -> Self {
        self.uniqueness = uniqueness;
        self
    }

    pub(crate) fn with_sub_attribute(mut self, attribute: AttributeScheme) -> Self {
        insert_attribute(&mut self.sub_attributes, attribute);
        self
    }

    pub(crate) fn with_canonical_values(mut self, values: &[&str]) -> Self {
        for value in values {
            insert_name(&mut self.canonical_values, value);
        }
        self
    }

    pub(crate) fn with_reference_types(mut self, values: &[&str]) -> Self {
        for value in values {
            insert_name(&mut self.reference_types, value);
        }
        self
    }

    /// Add a sub-attribute. Returns `false` when one with the same name exists.
    pub fn add_sub_attribute(&mut self, attribute: AttributeScheme) -> ScimResult<bool> {
        if attribute.name.trim().is_empty() {
            return Err(ScimError::invalid_argument(
                "subAttribute",
                "sub-attribute name must not be empty",
            ));
        }
        Ok(insert_attribute(&mut self.sub_attributes, attribute))
    }

    /// Add a canonical value. Returns `false` when already present.
    pub fn add_canonical_values(&mut self, value: &str) -> ScimResult<bool> {
        non_empty("canonicalValue", value)?;
        Ok(insert_name(&mut self.canonical_values, value))
    }

    /// Add a reference type. Returns `false` when already present.
    pub fn add_reference_types(&mut self, value: &str) -> ScimResult<bool> {
        non_empty("referenceType", value)?;
        Ok(insert_name(&mut self.reference_types, value))
    }

    pub fn sub_attributes(&self) -> &[AttributeScheme] {
        &self.sub_attributes
    }

    pub fn canonical_values(&self) -> &[String] {
        &self.canonical_values
    }

    pub fn reference_types(&self) -> &[String] {
        &self.reference_types
    }

    /// Find a sub-attribute by case-insensitive name.
    pub fn sub_attribute(&self, name: &str) -> Option<&AttributeScheme> {
        self.sub_attributes
            .iter()
            .find(|attribute| attribute.name.eq_ignore_ascii_case(name))
    }

    /// Compare two strings according to this attribute's case-exactness.
    pub fn values_equal(&self, left: &str, right: &str) -> bool {
        if self.case_exact {
            left == right
        } else {
            left.eq_ignore_ascii_case(right)
        }
    }
}

pub(crate) fn insert_attribute(
    attributes: &mut Vec<AttributeScheme>,
    attribute: AttributeScheme,
) -> bool {
    if attributes
        .iter()
        .any(|existing| existing.name.eq_ignore_ascii_case(&attribute.name))
    {
        return false;
    }
    attributes.push(attribute);
    true
}

fn insert_name(values: &mut Vec<String>, value: &str) -> bool {
    if values.iter().any(|existing| existing.eq_ignore_ascii_case(value)) {
        return false;
    }
    values.push(value.to_string());
    true
}

fn non_empty(argument: &str, value: &str) -> ScimResult<()> {
    if value.trim().is_empty() {
        return Err(ScimError::invalid_argument(
            argument,
            "value must not be empty",
        ));
    }
    Ok(())
}

/// SCIM attribute data types.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum AttributeDataType {
    #[default]
    String,
    Boolean,
    Decimal,
    Integer,
    DateTime,
    Binary,
    Reference,
    Complex,
}

/// Attribute mutability characteristics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum Mutability {
    /// Managed by the service provider
    ReadOnly,
    #[default]
    ReadWrite,
    /// Set once, never modified
    Immutable,
    /// Never returned (passwords)
    WriteOnly,
}

/// When an attribute appears in responses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum Returned {
    Always,
    Never,
    #[default]
    Default,
    Request,
}

/// Attribute uniqueness constraints.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum Uniqueness {
    #[default]
    None,
    Server,
    Global,
}
