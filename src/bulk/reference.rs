//! `bulkId:` back-references between operations of one bulk request.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

static BULK_REFERENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*bulkId\s*:\s*(?P<identifier>\S*)").expect("bulkId reference pattern")
});

/// The bulk identifier `value` refers to, if it is a `bulkId:` reference.
pub fn referenced_bulk_id(value: &str) -> Option<&str> {
    BULK_REFERENCE
        .captures(value)
        .and_then(|captures| captures.name("identifier"))
        .map(|identifier| identifier.as_str())
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("bulkId '{bulk_id}' does not refer to a resource created earlier in this request")]
pub struct UnresolvedReference {
    pub bulk_id: String,
}

/// Identifiers of the resources created so far, by `bulkId`.
///
/// Lookups are case-insensitive, matching how duplicate bulk identifiers are
/// detected.
#[derive(Debug, Clone, Default)]
pub struct BulkIdentifiers {
    created: HashMap<String, String>,
}

impl BulkIdentifiers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, bulk_id: &str, resource_id: impl Into<String>) {
        self.created
            .insert(bulk_id.to_ascii_lowercase(), resource_id.into());
    }

    pub fn lookup(&self, bulk_id: &str) -> Option<&str> {
        self.created
            .get(&bulk_id.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// `value` with a `bulkId:` reference replaced by the identifier it
    /// names. Values that are not references come back unchanged.
    pub fn resolve(&self, value: &str) -> Result<String, UnresolvedReference> {
        match referenced_bulk_id(value) {
            Some(bulk_id) => self
                .lookup(bulk_id)
                .map(str::to_string)
                .ok_or_else(|| UnresolvedReference {
                    bulk_id: bulk_id.to_string(),
                }),
            None => Ok(value.to_string()),
        }
    }

    /// Resolve every string inside `value`, at any depth.
    pub fn resolve_value(&self, value: &mut Value) -> Result<(), UnresolvedReference> {
        match value {
            Value::String(text) => {
                if referenced_bulk_id(text).is_some() {
                    *text = self.resolve(text)?;
                }
            }
            Value::Array(items) => {
                for item in items {
                    self.resolve_value(item)?;
                }
            }
            Value::Object(object) => {
                for item in object.values_mut() {
                    self.resolve_value(item)?;
                }
            }
            Value::Null | Value::Bool(_) | Value::Number(_) => {}
        }
        Ok(())
    }
}
