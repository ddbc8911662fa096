//! The error envelope of RFC 7644 §3.12.

use crate::error::{ScimError, ScimType};
use crate::resource::Schemas;
use crate::schema::identifiers;
use serde::{Deserialize, Serialize};

/// Error body returned for a failed request or bulk sub-operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub schemas: Schemas,
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scim_type: Option<ScimType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorResponse {
    pub fn new(status: u16, detail: impl Into<String>) -> Self {
        Self {
            schemas: Schemas::declared(identifiers::ERROR),
            status,
            scim_type: None,
            detail: Some(detail.into()),
        }
    }

    pub fn with_scim_type(mut self, scim_type: ScimType) -> Self {
        self.scim_type = Some(scim_type);
        self
    }
}

impl From<&ScimError> for ErrorResponse {
    fn from(error: &ScimError) -> Self {
        Self {
            schemas: Schemas::declared(identifiers::ERROR),
            status: error.status(),
            scim_type: error.scim_type(),
            detail: Some(error.detail()),
        }
    }
}

impl From<ScimError> for ErrorResponse {
    fn from(error: ScimError) -> Self {
        Self::from(&error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterError;
    use serde_json::json;

    #[test]
    fn test_invalid_filter_envelope() {
        let error = ScimError::from(FilterError::UnsupportedOperator {
            operator: "gt".to_string(),
            attribute: "userName".to_string(),
        });
        let value = serde_json::to_value(ErrorResponse::from(&error)).unwrap();
        assert_eq!(value["schemas"], json!([identifiers::ERROR]));
        assert_eq!(value["status"], json!(400));
        assert_eq!(value["scimType"], json!("invalidFilter"));
        assert!(value["detail"].as_str().unwrap().contains("gt"));
    }

    #[test]
    fn test_not_found_has_no_scim_type() {
        let response = ErrorResponse::from(ScimError::resource_not_found("User", "42"));
        assert_eq!(response.status, 404);
        let value = serde_json::to_value(&response).unwrap();
        assert!(value.get("scimType").is_none());
    }

    #[test]
    fn test_internal_detail_is_generic() {
        let response = ErrorResponse::from(ScimError::internal("database password is hunter2"));
        assert_eq!(response.status, 500);
        assert!(!response.detail.unwrap().contains("hunter2"));
    }
}
