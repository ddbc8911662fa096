//! The `schemas` attribute carried by every protocol object.

use crate::error::{ScimError, ScimResult};
use serde::{Deserialize, Deserializer, Serialize};

/// Ordered set of schema URNs.
///
/// Insertion order is preserved and membership is case-insensitive, so adding
/// the same URN twice (in any casing) leaves a single entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Schemas(Vec<String>);

impl Schemas {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a set holding one declaring schema.
    pub(crate) fn declared(uri: &str) -> Self {
        Self(vec![uri.to_string()])
    }

    /// Add a schema URN. Returns `true` when the URN was not already present.
    pub fn add(&mut self, uri: &str) -> ScimResult<bool> {
        let uri = uri.trim();
        if uri.is_empty() {
            return Err(ScimError::invalid_argument(
                "schemaIdentifier",
                "schema identifier must not be empty",
            ));
        }
        if self.contains(uri) {
            return Ok(false);
        }
        self.0.push(uri.to_string());
        Ok(true)
    }

    /// Append a known-valid URN when absent.
    pub(crate) fn ensure(&mut self, uri: &str) {
        if !self.contains(uri) {
            self.0.push(uri.to_string());
        }
    }

    /// Case-insensitive membership test.
    pub fn contains(&self, uri: &str) -> bool {
        self.0.iter().any(|existing| existing.eq_ignore_ascii_case(uri))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl<'de> Deserialize<'de> for Schemas {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Vec::<String>::deserialize(deserializer)?;
        let mut schemas = Schemas::new();
        for uri in raw {
            schemas.add(&uri).map_err(serde::de::Error::custom)?;
        }
        Ok(schemas)
    }
}
