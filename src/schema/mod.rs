//! Schema model for SCIM resources.
//!
//! This module implements the RFC 7643 schema vocabulary: attribute
//! definitions, schema documents, the service provider configuration and the
//! built-in catalog of core schemas.
//!
//! # Key Types
//!
//! - [`AttributeScheme`] - Definition of a single attribute and its characteristics
//! - [`TypeScheme`] - A schema document, itself served as a resource
//! - [`ServiceConfiguration`] - The `/ServiceProviderConfig` document
//!
//! # Examples
//!
//! ```rust
//! use scim_core::schema::{catalog, identifiers};
//!
//! let user_name = catalog::attribute(identifiers::CORE2_USER, "userName").unwrap();
//! assert!(user_name.required);
//! assert!(!user_name.case_exact);
//! ```

pub mod attribute;
pub mod catalog;
pub mod identifiers;
pub mod service_configuration;
pub mod type_scheme;

pub use attribute::{AttributeDataType, AttributeScheme, Mutability, Returned, Uniqueness};
pub use service_configuration::{
    AuthenticationScheme, BulkFeature, Feature, FilterFeature, ServiceConfiguration,
};
pub use type_scheme::TypeScheme;
