//! The `/ServiceProviderConfig` document.
//!
//! Besides being served verbatim to clients, the configuration is read by the
//! core itself: the bulk processor enforces `bulk.maxOperations` and the
//! in-memory provider caps pages at `filter.maxResults`.

use crate::error::{ScimError, ScimResult};
use crate::resource::{Metadata, Resource};
use crate::schema::identifiers;
use serde::{Deserialize, Serialize};

/// Service provider feature configuration (RFC 7643 §5).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceConfiguration {
    #[serde(flatten)]
    pub resource: Resource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation_uri: Option<String>,
    pub patch: Feature,
    pub bulk: BulkFeature,
    pub filter: FilterFeature,
    pub change_password: Feature,
    pub sort: Feature,
    pub etag: Feature,
    #[serde(default)]
    authentication_schemes: Vec<AuthenticationScheme>,
}

/// A feature that is either offered or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Feature {
    pub supported: bool,
}

impl Feature {
    pub fn new(supported: bool) -> Self {
        Self { supported }
    }
}

/// Bulk request limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkFeature {
    pub supported: bool,
    pub max_operations: usize,
    pub max_payload_size: usize,
}

/// Filtering limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterFeature {
    pub supported: bool,
    pub max_results: usize,
}

impl Default for ServiceConfiguration {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceConfiguration {
    /// Everything unsupported, no authentication schemes.
    pub fn new() -> Self {
        let mut resource = Resource::new(identifiers::CORE2_SERVICE_CONFIGURATION);
        resource.meta = Some(Metadata::new(
            identifiers::types::SERVICE_PROVIDER_CONFIGURATION,
        ));
        Self {
            resource,
            documentation_uri: None,
            patch: Feature::default(),
            bulk: BulkFeature::default(),
            filter: FilterFeature::default(),
            change_password: Feature::default(),
            sort: Feature::default(),
            etag: Feature::default(),
            authentication_schemes: Vec::new(),
        }
    }

    pub fn with_patch(mut self, supported: bool) -> Self {
        self.patch = Feature::new(supported);
        self
    }

    /// Enable bulk requests with the given limits.
    pub fn with_bulk(mut self, max_operations: usize, max_payload_size: usize) -> Self {
        self.bulk = BulkFeature {
            supported: true,
            max_operations,
            max_payload_size,
        };
        self
    }

    /// Enable filtering, returning at most `max_results` resources per page.
    pub fn with_filter(mut self, max_results: usize) -> Self {
        self.filter = FilterFeature {
            supported: true,
            max_results,
        };
        self
    }

    pub fn with_change_password(mut self, supported: bool) -> Self {
        self.change_password = Feature::new(supported);
        self
    }

    pub fn with_sort(mut self, supported: bool) -> Self {
        self.sort = Feature::new(supported);
        self
    }

    pub fn with_etag(mut self, supported: bool) -> Self {
        self.etag = Feature::new(supported);
        self
    }

    pub fn with_documentation_uri(mut self, uri: impl Into<String>) -> Self {
        self.documentation_uri = Some(uri.into());
        self
    }

    pub fn with_authentication_scheme(mut self, scheme: AuthenticationScheme) -> Self {
        // Unnamed or duplicate schemes are not registered.
        let _ = self.add_authentication_scheme(scheme);
        self
    }

    /// Register an authentication scheme. Returns `false` when one with the
    /// same name is already registered.
    pub fn add_authentication_scheme(&mut self, scheme: AuthenticationScheme) -> ScimResult<bool> {
        if scheme.name.trim().is_empty() {
            return Err(ScimError::invalid_argument(
                "authenticationScheme",
                "authentication scheme name must not be empty",
            ));
        }
        if self
            .authentication_schemes
            .iter()
            .any(|existing| existing.name.eq_ignore_ascii_case(&scheme.name))
        {
            return Ok(false);
        }
        self.authentication_schemes.push(scheme);
        Ok(true)
    }

    pub fn authentication_schemes(&self) -> &[AuthenticationScheme] {
        &self.authentication_schemes
    }
}

/// Authentication scheme entry of the service provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationScheme {
    /// Authentication scheme name
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// URI for more information
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec_uri: Option<String>,
    /// URI for documentation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation_uri: Option<String>,
    /// Authentication type (e.g., "oauthbearertoken", "httpbasic")
    #[serde(rename = "type")]
    pub auth_type: String,
    /// Whether this scheme is the primary authentication method
    #[serde(default)]
    pub primary: bool,
}

impl AuthenticationScheme {
    /// The OAuth bearer token scheme.
    pub fn oauth_bearer_token() -> Self {
        Self {
            name: "OAuth Bearer Token".to_string(),
            description: "Authentication Scheme using the OAuth Bearer Token Standard"
                .to_string(),
            spec_uri: Some("http://tools.ietf.org/html/draft-ietf-oauth-v2-bearer-01".to_string()),
            documentation_uri: Some("http://example.com/help/oauth.html".to_string()),
            auth_type: "oauthbearertoken".to_string(),
            primary: true,
        }
    }
}
