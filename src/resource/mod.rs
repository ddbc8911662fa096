//! SCIM resource model.
//!
//! Every protocol resource embeds the common [`Resource`] attributes (`schemas`,
//! `id`, `externalId`, `meta`). The typed resources served through providers
//! implement [`ResourceKind`], which is what the generic adapter, the bulk
//! processor and the addressing helpers are written against.
//!
//! # Key Components
//!
//! * [`Resource`] - Common attributes and the idempotent schema set
//! * [`Core2User`] / [`Core2Group`] - The typed core resources
//! * [`Core2ResourceType`] - Resource type documents
//! * [`ResourceVersion`] - Content-derived weak ETags for `meta.version`
//! * [`projection`] - `attributes` / `excludedAttributes` handling

pub mod core;
pub mod group;
pub mod projection;
pub mod resource_type;
pub mod schemas;
pub mod user;
pub mod version;

pub use self::core::{Metadata, Resource, ResourceKind};
pub use group::{Core2Group, Member};
pub use resource_type::{Core2ResourceType, SchemaExtensionReference};
pub use schemas::Schemas;
pub use user::{Core2User, EnterpriseExtension, Manager, Name, TypedValue};
pub use version::{ResourceVersion, VersionError};
