//! Content-derived resource versions.
//!
//! `meta.version` carries a weak entity tag computed from the resource's JSON
//! content with SHA-256. Two resources with identical content always carry the
//! same version, and any change to the content changes it.

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// Opaque version identifier, displayed as a weak ETag (`W/"..."`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceVersion {
    opaque: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    #[error("Invalid ETag format: {0}")]
    InvalidEtagFormat(String),
}

impl ResourceVersion {
    /// Hash raw content into a version.
    pub fn from_content(content: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(content);
        let hash = hasher.finalize();
        // First 8 bytes keep the tag short.
        Self {
            opaque: BASE64.encode(&hash[..8]),
        }
    }

    /// Hash the JSON serialization of `value`.
    pub fn from_resource<T: Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        let content = serde_json::to_vec(value)?;
        Ok(Self::from_content(&content))
    }

    pub fn as_str(&self) -> &str {
        &self.opaque
    }
}

impl fmt::Display for ResourceVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "W/\"{}\"", self.opaque)
    }
}

impl FromStr for ResourceVersion {
    type Err = VersionError;

    /// Parse a weak or strong ETag.
    fn from_str(etag: &str) -> Result<Self, Self::Err> {
        let trimmed = etag.trim();
        let tag = trimmed.strip_prefix("W/").unwrap_or(trimmed);
        let opaque = tag
            .strip_prefix('"')
            .and_then(|rest| rest.strip_suffix('"'))
            .filter(|opaque| !opaque.is_empty())
            .ok_or_else(|| VersionError::InvalidEtagFormat(etag.to_string()))?;
        Ok(Self {
            opaque: opaque.to_string(),
        })
    }
}
