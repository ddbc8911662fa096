//! The core Group resource.

use crate::resource::core::{Resource, ResourceKind};
use crate::schema::identifiers;
use serde::{Deserialize, Serialize};

/// A Group (RFC 7643 §4.2).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Core2Group {
    #[serde(flatten)]
    pub resource: Resource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<Member>,
}

/// An entry of `members`.
///
/// Two members are the same member when their `value`s match
/// case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub value: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl Member {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Self::default()
        }
    }

    pub fn user(value: impl Into<String>) -> Self {
        Self {
            kind: Some(identifiers::types::USER.to_string()),
            ..Self::new(value)
        }
    }

    pub fn same_member(&self, value: &str) -> bool {
        self.value.eq_ignore_ascii_case(value)
    }
}

impl Default for Core2Group {
    fn default() -> Self {
        Self::new()
    }
}

impl Core2Group {
    pub fn new() -> Self {
        Self {
            resource: Resource::new(identifiers::CORE2_GROUP),
            display_name: None,
            members: Vec::new(),
        }
    }

    pub fn with_display_name(display_name: impl Into<String>) -> Self {
        Self {
            display_name: Some(display_name.into()),
            ..Self::new()
        }
    }

    pub fn has_member(&self, value: &str) -> bool {
        self.members.iter().any(|member| member.same_member(value))
    }
}

impl ResourceKind for Core2Group {
    const SCHEMA: &'static str = identifiers::CORE2_GROUP;
    const RESOURCE_TYPE: &'static str = identifiers::types::GROUP;
    const BASE_COLLECTION: &'static str = "Groups";

    fn resource(&self) -> &Resource {
        &self.resource
    }

    fn resource_mut(&mut self) -> &mut Resource {
        &mut self.resource
    }
}
