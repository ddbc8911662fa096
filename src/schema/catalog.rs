//! Built-in schema documents and resource types.
//!
//! Each catalog entry is built once on first use and is read-only afterwards.

use crate::resource::Core2ResourceType;
use crate::schema::attribute::{
    AttributeDataType, AttributeScheme, Mutability, Returned, Uniqueness,
};
use crate::schema::identifiers;
use crate::schema::type_scheme::TypeScheme;
use once_cell::sync::Lazy;

/// Canonical values of `emails.type`.
pub const EMAIL_TYPES: &[&str] = &["work", "home", "other"];
/// Canonical values of `phoneNumbers.type`.
pub const PHONE_NUMBER_TYPES: &[&str] = &["work", "home", "mobile", "fax", "pager", "other"];

pub static USER: Lazy<TypeScheme> = Lazy::new(user);
pub static ENTERPRISE_USER: Lazy<TypeScheme> = Lazy::new(enterprise_user);
pub static GROUP: Lazy<TypeScheme> = Lazy::new(group);
pub static RESOURCE_TYPE: Lazy<TypeScheme> = Lazy::new(resource_type);
pub static SCHEMA: Lazy<TypeScheme> = Lazy::new(schema_document);
pub static SERVICE_PROVIDER_CONFIGURATION: Lazy<TypeScheme> =
    Lazy::new(service_provider_configuration);

pub static USER_RESOURCE_TYPE: Lazy<Core2ResourceType> = Lazy::new(|| {
    Core2ResourceType::new(identifiers::types::USER, "/Users", identifiers::CORE2_USER)
        .with_description("User Account")
        .with_schema_extension(identifiers::CORE2_ENTERPRISE_USER, false)
});

pub static GROUP_RESOURCE_TYPE: Lazy<Core2ResourceType> = Lazy::new(|| {
    Core2ResourceType::new(identifiers::types::GROUP, "/Groups", identifiers::CORE2_GROUP)
        .with_description("Group")
});

/// All built-in schema documents.
pub fn schemas() -> Vec<&'static TypeScheme> {
    vec![
        &*USER,
        &*ENTERPRISE_USER,
        &*GROUP,
        &*RESOURCE_TYPE,
        &*SCHEMA,
        &*SERVICE_PROVIDER_CONFIGURATION,
    ]
}

/// The built-in User and Group resource types.
pub fn resource_types() -> Vec<&'static Core2ResourceType> {
    vec![&*USER_RESOURCE_TYPE, &*GROUP_RESOURCE_TYPE]
}

/// Find a built-in schema document by URN.
pub fn schema(uri: &str) -> Option<&'static TypeScheme> {
    schemas()
        .into_iter()
        .find(|scheme| scheme.identifier().eq_ignore_ascii_case(uri))
}

/// Resolve an attribute path against the built-in schema `uri`.
pub fn attribute(uri: &str, path: &str) -> Option<&'static AttributeScheme> {
    schema(uri)?.resolve(path)
}

fn string(name: &str) -> AttributeScheme {
    AttributeScheme::builtin(name, AttributeDataType::String, false)
}

fn boolean(name: &str) -> AttributeScheme {
    AttributeScheme::builtin(name, AttributeDataType::Boolean, false)
}

fn integer(name: &str) -> AttributeScheme {
    AttributeScheme::builtin(name, AttributeDataType::Integer, false)
}

fn date_time(name: &str) -> AttributeScheme {
    AttributeScheme::builtin(name, AttributeDataType::DateTime, false)
}

fn reference(name: &str, types: &[&str]) -> AttributeScheme {
    AttributeScheme::builtin(name, AttributeDataType::Reference, false).with_reference_types(types)
}

fn complex(name: &str, plural: bool) -> AttributeScheme {
    AttributeScheme::builtin(name, AttributeDataType::Complex, plural)
}

fn feature(name: &str) -> AttributeScheme {
    complex(name, false).required().with_sub_attribute(boolean("supported").required())
}

/// `value`/`display`/`type`/`primary` shape shared by emails, phone numbers and roles.
fn typed_values(name: &str, types: &[&str]) -> AttributeScheme {
    complex(name, true)
        .with_sub_attribute(string("value"))
        .with_sub_attribute(string("display"))
        .with_sub_attribute(string("type").with_canonical_values(types))
        .with_sub_attribute(boolean("primary"))
}

/// `id`, `externalId` and `meta`, common to every resource.
fn with_common_attributes(scheme: TypeScheme) -> TypeScheme {
    scheme
        .with_attribute(
            string("id")
                .case_exact()
                .with_mutability(Mutability::ReadOnly)
                .with_returned(Returned::Always)
                .with_uniqueness(Uniqueness::Server),
        )
        .with_attribute(string("externalId").case_exact())
        .with_attribute(
            complex("meta", false)
                .with_mutability(Mutability::ReadOnly)
                .with_sub_attribute(string("resourceType").case_exact())
                .with_sub_attribute(date_time("created"))
                .with_sub_attribute(date_time("lastModified"))
                .with_sub_attribute(reference("location", &["uri"]))
                .with_sub_attribute(string("version").case_exact()),
        )
}

fn user() -> TypeScheme {
    let name = complex("name", false)
        .with_sub_attribute(string("formatted"))
        .with_sub_attribute(string("familyName"))
        .with_sub_attribute(string("givenName"))
        .with_sub_attribute(string("middleName"))
        .with_sub_attribute(string("honorificPrefix"))
        .with_sub_attribute(string("honorificSuffix"));

    let scheme = TypeScheme::builtin(identifiers::CORE2_USER, "User")
        .with_description("User Account")
        .with_attribute(
            string("userName")
                .required()
                .with_uniqueness(Uniqueness::Server),
        )
        .with_attribute(name)
        .with_attribute(string("displayName"))
        .with_attribute(string("nickName"))
        .with_attribute(string("title"))
        .with_attribute(string("userType"))
        .with_attribute(string("preferredLanguage"))
        .with_attribute(string("locale"))
        .with_attribute(string("timezone"))
        .with_attribute(boolean("active"))
        .with_attribute(
            string("password")
                .with_mutability(Mutability::WriteOnly)
                .with_returned(Returned::Never),
        )
        .with_attribute(typed_values("emails", EMAIL_TYPES))
        .with_attribute(typed_values("phoneNumbers", PHONE_NUMBER_TYPES))
        .with_attribute(typed_values("roles", &[]));
    with_common_attributes(scheme)
}

fn enterprise_user() -> TypeScheme {
    let manager = complex("manager", false)
        .with_sub_attribute(string("value"))
        .with_sub_attribute(reference("$ref", &[identifiers::types::USER]))
        .with_sub_attribute(string("displayName").with_mutability(Mutability::ReadOnly));

    TypeScheme::builtin(identifiers::CORE2_ENTERPRISE_USER, "EnterpriseUser")
        .with_description("Enterprise User")
        .with_attribute(string("employeeNumber"))
        .with_attribute(string("costCenter"))
        .with_attribute(string("organization"))
        .with_attribute(string("division"))
        .with_attribute(string("department"))
        .with_attribute(manager)
}

fn group() -> TypeScheme {
    let members = complex("members", true)
        .with_sub_attribute(string("value").with_mutability(Mutability::Immutable))
        .with_sub_attribute(
            reference("$ref", &[identifiers::types::USER, identifiers::types::GROUP])
                .with_mutability(Mutability::Immutable),
        )
        .with_sub_attribute(string("display"))
        .with_sub_attribute(
            string("type")
                .with_mutability(Mutability::Immutable)
                .with_canonical_values(&[identifiers::types::USER, identifiers::types::GROUP]),
        );

    let scheme = TypeScheme::builtin(identifiers::CORE2_GROUP, "Group")
        .with_description("Group")
        .with_attribute(string("displayName"))
        .with_attribute(members);
    with_common_attributes(scheme)
}

fn resource_type() -> TypeScheme {
    let extensions = complex("schemaExtensions", true)
        .with_sub_attribute(reference("schema", &["uri"]).required().case_exact())
        .with_sub_attribute(boolean("required").required());

    TypeScheme::builtin(identifiers::CORE2_RESOURCE_TYPE, "ResourceType")
        .with_description("Specifies the schema that describes a SCIM resource type")
        .with_attribute(string("id").with_mutability(Mutability::ReadOnly))
        .with_attribute(string("name").required())
        .with_attribute(string("description"))
        .with_attribute(reference("endpoint", &["uri"]).required())
        .with_attribute(reference("schema", &["uri"]).required().case_exact())
        .with_attribute(extensions)
}

fn schema_document() -> TypeScheme {
    let sub_attributes = complex("subAttributes", true)
        .with_sub_attribute(string("name").required().case_exact())
        .with_sub_attribute(string("type").required())
        .with_sub_attribute(boolean("multiValued").required());

    let attributes = complex("attributes", true)
        .required()
        .with_sub_attribute(string("name").required().case_exact())
        .with_sub_attribute(
            string("type").required().with_canonical_values(&[
                "string", "complex", "boolean", "decimal", "integer", "dateTime", "reference",
                "binary",
            ]),
        )
        .with_sub_attribute(boolean("multiValued").required())
        .with_sub_attribute(string("description"))
        .with_sub_attribute(boolean("required"))
        .with_sub_attribute(string("canonicalValues").case_exact())
        .with_sub_attribute(boolean("caseExact"))
        .with_sub_attribute(string("mutability").with_canonical_values(&[
            "readOnly",
            "readWrite",
            "immutable",
            "writeOnly",
        ]))
        .with_sub_attribute(string("returned").with_canonical_values(&[
            "always", "never", "default", "request",
        ]))
        .with_sub_attribute(string("uniqueness").with_canonical_values(&[
            "none", "server", "global",
        ]))
        .with_sub_attribute(string("referenceTypes"))
        .with_sub_attribute(sub_attributes);

    TypeScheme::builtin(identifiers::CORE2_SCHEMA, "Schema")
        .with_description("Specifies the schema attribute definitions")
        .with_attribute(string("id").with_mutability(Mutability::ReadOnly))
        .with_attribute(string("name"))
        .with_attribute(string("description"))
        .with_attribute(attributes)
}

fn service_provider_configuration() -> TypeScheme {
    let bulk = complex("bulk", false)
        .required()
        .with_sub_attribute(boolean("supported").required())
        .with_sub_attribute(integer("maxOperations").required())
        .with_sub_attribute(integer("maxPayloadSize").required());

    let filter = complex("filter", false)
        .required()
        .with_sub_attribute(boolean("supported").required())
        .with_sub_attribute(integer("maxResults").required());

    let authentication_schemes = complex("authenticationSchemes", true)
        .required()
        .with_sub_attribute(string("type").required())
        .with_sub_attribute(string("name").required())
        .with_sub_attribute(string("description").required())
        .with_sub_attribute(reference("specUri", &["external"]))
        .with_sub_attribute(reference("documentationUri", &["external"]))
        .with_sub_attribute(boolean("primary"));

    TypeScheme::builtin(
        identifiers::CORE2_SERVICE_CONFIGURATION,
        "Service Provider Configuration",
    )
    .with_description("Schema for representing the service provider's configuration")
    .with_attribute(
        reference("documentationUri", &["external"]).with_mutability(Mutability::ReadOnly),
    )
    .with_attribute(feature("patch"))
    .with_attribute(bulk)
    .with_attribute(filter)
    .with_attribute(feature("changePassword"))
    .with_attribute(feature("sort"))
    .with_attribute(feature("etag"))
    .with_attribute(authentication_schemes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_contains_all_documents() {
        let uris: Vec<&str> = schemas().iter().map(|scheme| scheme.identifier()).collect();
        assert_eq!(uris.len(), 6);
        assert!(uris.contains(&identifiers::CORE2_USER));
        assert!(uris.contains(&identifiers::CORE2_ENTERPRISE_USER));
        assert!(uris.contains(&identifiers::CORE2_SERVICE_CONFIGURATION));
    }

    #[test]
    fn test_user_name_definition() {
        let user_name = attribute(identifiers::CORE2_USER, "userName").unwrap();
        assert!(user_name.required);
        assert!(!user_name.case_exact);
        assert_eq!(user_name.uniqueness, Uniqueness::Server);
    }

    #[test]
    fn test_typed_value_canonical_types() {
        let email_type = attribute(identifiers::CORE2_USER, "emails.type").unwrap();
        assert_eq!(email_type.canonical_values().len(), EMAIL_TYPES.len());
        let phone_type = attribute(identifiers::CORE2_USER, "phoneNumbers.type").unwrap();
        assert!(phone_type.canonical_values().iter().any(|value| value == "pager"));
        let role_type = attribute(identifiers::CORE2_USER, "roles.type").unwrap();
        assert!(role_type.canonical_values().is_empty());
    }

    #[test]
    fn test_password_is_never_returned() {
        let password = attribute(identifiers::CORE2_USER, "password").unwrap();
        assert_eq!(password.returned, Returned::Never);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert!(schema(&identifiers::CORE2_GROUP.to_uppercase()).is_some());
        assert!(attribute(identifiers::CORE2_GROUP, "MEMBERS.value").is_some());
        assert!(schema("urn:example:unknown").is_none());
    }

    #[test]
    fn test_resource_types() {
        let types = resource_types();
        assert_eq!(types.len(), 2);
        assert_eq!(USER_RESOURCE_TYPE.endpoint, "/Users");
        assert_eq!(GROUP_RESOURCE_TYPE.schema, identifiers::CORE2_GROUP);
        assert_eq!(USER_RESOURCE_TYPE.schema_extensions().len(), 1);
    }
}
