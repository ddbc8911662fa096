//! Wire model of PATCH requests.

use crate::filter::{ComparisonOperator, Path};
use crate::patch::{PatchError, PatchResult};
use crate::resource::Schemas;
use crate::schema::identifiers;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// The `op` of a patch operation, matched case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationName {
    Add,
    Remove,
    Replace,
}

impl OperationName {
    pub fn as_str(self) -> &'static str {
        match self {
            OperationName::Add => "add",
            OperationName::Remove => "remove",
            OperationName::Replace => "replace",
        }
    }
}

impl fmt::Display for OperationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationName {
    type Err = String;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.trim().to_ascii_lowercase().as_str() {
            "add" => Ok(OperationName::Add),
            "remove" => Ok(OperationName::Remove),
            "replace" => Ok(OperationName::Replace),
            other => Err(format!("unsupported patch operation '{}'", other)),
        }
    }
}

impl Serialize for OperationName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for OperationName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer)?
            .parse()
            .map_err(serde::de::Error::custom)
    }
}

/// One `{value, $ref}` pair carried by an operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

/// The `value` of a patch operation.
///
/// Booleans and numbers become their string form and `null` becomes an
/// absent scalar. Scalars inside an array are wrapped as `{"value": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PatchValue {
    Scalar(Option<String>),
    Object(Map<String, Value>),
    List(Vec<Map<String, Value>>),
}

impl PatchValue {
    pub fn scalar(value: impl Into<String>) -> Self {
        PatchValue::Scalar(Some(value.into()))
    }

    /// Flatten into `{value, $ref}` pairs.
    pub fn values(&self) -> Vec<OperationValue> {
        match self {
            PatchValue::Scalar(None) => Vec::new(),
            PatchValue::Scalar(Some(value)) => vec![OperationValue {
                value: Some(value.clone()),
                reference: None,
            }],
            PatchValue::Object(object) => vec![operation_value(object)],
            PatchValue::List(items) => items.iter().map(operation_value).collect(),
        }
    }

    /// The value as a list of objects.
    pub(crate) fn objects(&self) -> Vec<Map<String, Value>> {
        match self {
            PatchValue::Scalar(None) => Vec::new(),
            PatchValue::Scalar(Some(value)) => vec![wrap(Value::String(value.clone()))],
            PatchValue::Object(object) => vec![object.clone()],
            PatchValue::List(items) => items.clone(),
        }
    }
}

impl From<Value> for PatchValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(object) => PatchValue::Object(object),
            Value::Array(items) => PatchValue::List(
                items
                    .into_iter()
                    .filter(|item| !item.is_null())
                    .map(|item| match item {
                        Value::Object(object) => object,
                        scalar => wrap(scalar),
                    })
                    .collect(),
            ),
            scalar => PatchValue::Scalar(scalar_text(&scalar)),
        }
    }
}

impl<'de> Deserialize<'de> for PatchValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(PatchValue::from)
    }
}

/// String form of a JSON scalar. Objects, arrays and `null` have none.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn wrap(scalar: Value) -> Map<String, Value> {
    let mut object = Map::new();
    object.insert("value".to_string(), scalar);
    object
}

fn operation_value(object: &Map<String, Value>) -> OperationValue {
    OperationValue {
        value: object.get("value").and_then(scalar_text),
        reference: object.get("$ref").and_then(scalar_text),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawPatchOperation {
    op: OperationName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<PatchValue>,
}

/// One entry of `Operations`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPatchOperation", into = "RawPatchOperation")]
pub struct PatchOperation {
    pub op: OperationName,
    pub path: Option<Path>,
    pub value: Option<PatchValue>,
}

impl TryFrom<RawPatchOperation> for PatchOperation {
    type Error = PatchError;

    fn try_from(raw: RawPatchOperation) -> Result<Self, Self::Error> {
        let path = match raw.path.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(text) => Some(
                Path::parse(text)
                    .map_err(|error| PatchError::invalid_path(text, error.to_string()))?,
            ),
        };
        Ok(collapse_member_removal(PatchOperation {
            op: raw.op,
            path,
            value: raw.value,
        }))
    }
}

impl From<PatchOperation> for RawPatchOperation {
    fn from(operation: PatchOperation) -> Self {
        RawPatchOperation {
            op: operation.op,
            path: operation.path.map(|path| path.to_string()),
            value: operation.value,
        }
    }
}

/// `remove members[value eq "X"]` without a value is the same as removing
/// `X` from `members`.
fn collapse_member_removal(operation: PatchOperation) -> PatchOperation {
    if operation.op != OperationName::Remove || operation.value.is_some() {
        return operation;
    }
    let Some(path) = &operation.path else {
        return operation;
    };
    if !path.attribute_path.to_ascii_lowercase().contains("members") || path.value_path.is_some()
    {
        return operation;
    }
    let member = path.single_sub_filter().and_then(|filter| {
        (filter.targets("value") && filter.operator == ComparisonOperator::Equals)
            .then(|| filter.comparison_value.clone())
            .flatten()
    });
    match member {
        Some(value) => PatchOperation {
            op: OperationName::Remove,
            path: Some(Path::new("members")),
            value: Some(PatchValue::Scalar(Some(value))),
        },
        None => operation,
    }
}

impl PatchOperation {
    /// Build an operation from its wire parts.
    pub fn new(op: OperationName, path: Option<&str>, value: Option<Value>) -> PatchResult<Self> {
        PatchOperation::try_from(RawPatchOperation {
            op,
            path: path.map(str::to_string),
            value: value.map(PatchValue::from),
        })
    }

    pub fn add(path: &str, value: Value) -> PatchResult<Self> {
        Self::new(OperationName::Add, Some(path), Some(value))
    }

    pub fn replace(path: &str, value: Value) -> PatchResult<Self> {
        Self::new(OperationName::Replace, Some(path), Some(value))
    }

    pub fn remove(path: &str) -> PatchResult<Self> {
        Self::new(OperationName::Remove, Some(path), None)
    }

    /// The carried `{value, $ref}` pairs.
    pub fn values(&self) -> Vec<OperationValue> {
        self.value
            .as_ref()
            .map(PatchValue::values)
            .unwrap_or_default()
    }

    /// The single carried value, if any. More than one is an error.
    pub(crate) fn single_value(&self) -> PatchResult<Option<String>> {
        let mut values = self.values();
        match values.len() {
            0 => Ok(None),
            1 => Ok(values.pop().and_then(|value| value.value)),
            count => Err(PatchError::invalid_value(
                self.target(),
                format!("expected a single value, found {}", count),
            )),
        }
    }

    /// Like [`single_value`](Self::single_value) but a value is mandatory.
    pub(crate) fn required_value(&self) -> PatchResult<String> {
        self.single_value()?.ok_or_else(|| {
            PatchError::invalid_value(self.target(), format!("'{}' requires a value", self.op))
        })
    }

    /// The path as written, for messages.
    pub(crate) fn target(&self) -> String {
        self.path
            .as_ref()
            .map(Path::to_string)
            .unwrap_or_default()
    }
}

/// A PATCH request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchRequest {
    #[serde(default = "patch_schemas")]
    pub schemas: Schemas,
    #[serde(rename = "Operations", default)]
    pub operations: Vec<PatchOperation>,
}

fn patch_schemas() -> Schemas {
    Schemas::declared(identifiers::PATCH_OPERATION)
}

impl Default for PatchRequest {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl PatchRequest {
    pub fn new(operations: Vec<PatchOperation>) -> Self {
        Self {
            schemas: patch_schemas(),
            operations,
        }
    }

    pub fn with_operation(mut self, operation: PatchOperation) -> Self {
        self.operations.push(operation);
        self
    }
}
