//! Wire types of `POST /Bulk` (RFC 7644 §3.7).

use crate::error::{ScimError, ScimResult};
use crate::patch::PatchRequest;
use crate::resource::Schemas;
use crate::schema::identifiers;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

/// HTTP method of a bulk operation.
///
/// Any method name deserializes; the ones a bulk request may not use are
/// rejected per operation when the request is processed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BulkMethod {
    Delete,
    Get,
    Patch,
    Post,
    Put,
    Other(String),
}

impl BulkMethod {
    pub fn as_str(&self) -> &str {
        match self {
            BulkMethod::Delete => "DELETE",
            BulkMethod::Get => "GET",
            BulkMethod::Patch => "PATCH",
            BulkMethod::Post => "POST",
            BulkMethod::Put => "PUT",
            BulkMethod::Other(name) => name,
        }
    }
}

impl From<&str> for BulkMethod {
    fn from(name: &str) -> Self {
        match name.trim().to_ascii_uppercase().as_str() {
            "DELETE" => BulkMethod::Delete,
            "GET" => BulkMethod::Get,
            "PATCH" => BulkMethod::Patch,
            "POST" => BulkMethod::Post,
            "PUT" => BulkMethod::Put,
            _ => BulkMethod::Other(name.to_string()),
        }
    }
}

impl fmt::Display for BulkMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for BulkMethod {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for BulkMethod {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(BulkMethod::from(name.as_str()))
    }
}

fn generated_bulk_id() -> String {
    Uuid::new_v4().to_string()
}

/// One entry of a bulk request's `Operations`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkRequestOperation {
    pub method: BulkMethod,
    /// Operations without one on the wire get a generated identifier
    #[serde(default = "generated_bulk_id")]
    pub bulk_id: String,
    /// Relative path such as `/Users` or `/Groups/{id}`
    #[serde(default)]
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl BulkRequestOperation {
    pub fn new(method: BulkMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            bulk_id: generated_bulk_id(),
            path: path.into(),
            data: None,
        }
    }

    pub fn post(path: impl Into<String>, data: Value) -> Self {
        Self::new(BulkMethod::Post, path).with_data(data)
    }

    pub fn patch(path: impl Into<String>, patch: &PatchRequest) -> ScimResult<Self> {
        Ok(Self::new(BulkMethod::Patch, path).with_data(serde_json::to_value(patch)?))
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(BulkMethod::Delete, path)
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(BulkMethod::Get, path)
    }

    pub fn with_bulk_id(mut self, bulk_id: impl Into<String>) -> Self {
        self.bulk_id = bulk_id.into();
        self
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBulkRequest {
    #[serde(default)]
    schemas: Schemas,
    #[serde(default)]
    fail_on_errors: Option<usize>,
    #[serde(rename = "Operations", default)]
    operations: Vec<BulkRequestOperation>,
}

/// The body of `POST /Bulk`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawBulkRequest")]
pub struct BulkRequest {
    pub schemas: Schemas,
    /// Stop after this many failed operations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_on_errors: Option<usize>,
    #[serde(rename = "Operations")]
    operations: Vec<BulkRequestOperation>,
}

impl TryFrom<RawBulkRequest> for BulkRequest {
    type Error = ScimError;

    fn try_from(raw: RawBulkRequest) -> Result<Self, Self::Error> {
        let mut request = BulkRequest {
            schemas: raw.schemas,
            fail_on_errors: raw.fail_on_errors,
            operations: Vec::with_capacity(raw.operations.len()),
        };
        if request.schemas.is_empty() {
            request.schemas = Schemas::declared(identifiers::BULK_REQUEST);
        }
        for operation in raw.operations {
            request.add_operation(operation)?;
        }
        Ok(request)
    }
}

impl Default for BulkRequest {
    fn default() -> Self {
        Self::new()
    }
}

impl BulkRequest {
    pub fn new() -> Self {
        Self {
            schemas: Schemas::declared(identifiers::BULK_REQUEST),
            fail_on_errors: None,
            operations: Vec::new(),
        }
    }

    pub fn with_fail_on_errors(mut self, fail_on_errors: usize) -> Self {
        self.fail_on_errors = Some(fail_on_errors);
        self
    }

    /// Append an operation.
    ///
    /// Returns `false` without adding anything when an operation with the
    /// same `bulkId` (compared case-insensitively) is already present.
    pub fn add_operation(&mut self, operation: BulkRequestOperation) -> ScimResult<bool> {
        if operation.bulk_id.trim().is_empty() {
            return Err(ScimError::invalid_argument(
                "bulkId",
                "bulk operations must carry a non-empty bulkId",
            ));
        }
        if self
            .operations
            .iter()
            .any(|existing| existing.bulk_id.eq_ignore_ascii_case(&operation.bulk_id))
        {
            return Ok(false);
        }
        self.operations.push(operation);
        Ok(true)
    }

    pub fn with_operation(mut self, operation: BulkRequestOperation) -> ScimResult<Self> {
        self.add_operation(operation)?;
        Ok(self)
    }

    pub fn operations(&self) -> &[BulkRequestOperation] {
        &self.operations
    }

    pub fn into_operations(self) -> Vec<BulkRequestOperation> {
        self.operations
    }
}

/// Result of one executed bulk operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkResponseOperation {
    pub method: BulkMethod,
    pub bulk_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// The resource for GET, the error envelope for failures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
    #[serde(with = "status_text")]
    pub status: u16,
}

impl BulkResponseOperation {
    pub fn is_error(&self) -> bool {
        self.status >= 400
    }
}

/// `status` travels as a string, such as `"201"`.
mod status_text {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    pub fn serialize<S: Serializer>(status: &u16, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&status.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u16, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::String(text) => text
                .trim()
                .parse()
                .map_err(|_| D::Error::custom(format!("'{}' is not a status code", text))),
            Value::Number(number) => number
                .as_u64()
                .and_then(|status| u16::try_from(status).ok())
                .ok_or_else(|| D::Error::custom(format!("{} is not a status code", number))),
            other => Err(D::Error::custom(format!("{} is not a status code", other))),
        }
    }
}

/// The body answering `POST /Bulk`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkResponse {
    pub schemas: Schemas,
    #[serde(rename = "Operations", default)]
    pub operations: Vec<BulkResponseOperation>,
}

impl Default for BulkResponse {
    fn default() -> Self {
        Self::new()
    }
}

impl BulkResponse {
    pub fn new() -> Self {
        Self {
            schemas: Schemas::declared(identifiers::BULK_RESPONSE),
            operations: Vec::new(),
        }
    }

    pub fn add_operation(&mut self, operation: BulkResponseOperation) {
        self.operations.push(operation);
    }

    /// Number of failed operations.
    pub fn failures(&self) -> usize {
        self.operations.iter().filter(|operation| operation.is_error()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_add_operation() {
        let mut request = BulkRequest::new();
        assert!(
            request
                .add_operation(BulkRequestOperation::delete("/Users/1").with_bulk_id("q1"))
                .unwrap()
        );
        assert!(
            !request
                .add_operation(BulkRequestOperation::delete("/Users/2").with_bulk_id("Q1"))
                .unwrap()
        );
        assert!(
            request
                .add_operation(BulkRequestOperation::delete("/Users/3").with_bulk_id("  "))
                .is_err()
        );
        assert_eq!(request.operations().len(), 1);
        assert_eq!(request.operations()[0].path, "/Users/1");
    }

    #[test]
    fn test_request_from_wire() {
        let request: BulkRequest = serde_json::from_value(json!({
            "schemas": [identifiers::BULK_REQUEST],
            "failOnErrors": 1,
            "Operations": [
                {
                    "method": "post",
                    "path": "/Users",
                    "bulkId": "qwerty",
                    "data": {"userName": "Alice"}
                },
                {"method": "DELETE", "path": "/Users/b7c14771"}
            ]
        }))
        .unwrap();

        assert_eq!(request.fail_on_errors, Some(1));
        let operations = request.operations();
        assert_eq!(operations[0].method, BulkMethod::Post);
        assert_eq!(operations[0].bulk_id, "qwerty");
        assert_eq!(operations[1].method, BulkMethod::Delete);
        assert!(Uuid::parse_str(&operations[1].bulk_id).is_ok());
    }

    #[test]
    fn test_unknown_method_survives_parsing() {
        let operation: BulkRequestOperation =
            serde_json::from_value(json!({"method": "TRACE", "path": "/Users", "bulkId": "1"}))
                .unwrap();
        assert_eq!(operation.method, BulkMethod::Other("TRACE".to_string()));
        assert_eq!(serde_json::to_value(&operation).unwrap()["method"], "TRACE");
    }

    #[test]
    fn test_response_status_is_text() {
        let mut response = BulkResponse::new();
        response.add_operation(BulkResponseOperation {
            method: BulkMethod::Post,
            bulk_id: "qwerty".to_string(),
            location: Some("https://example.com/v2/Users/92b725cd".to_string()),
            response: None,
            status: 201,
        });

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["schemas"], json!([identifiers::BULK_RESPONSE]));
        assert_eq!(value["Operations"][0]["status"], "201");
        assert_eq!(value["Operations"][0]["bulkId"], "qwerty");

        let parsed: BulkResponse = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, response);
        assert_eq!(parsed.failures(), 0);
    }
}
