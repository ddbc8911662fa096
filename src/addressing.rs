//! Mapping resources and schemas to collection paths and resource URIs.

use crate::error::{ScimError, ScimResult};
use crate::protocol::ProtocolConstants;
use crate::resource::ResourceKind;
use crate::schema::identifiers;
use url::Url;

/// A custom schema served from its own collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaExtension {
    pub schema_identifier: String,
    /// Collection segment, e.g. `Devices`
    pub path: String,
}

impl SchemaExtension {
    pub fn new(schema_identifier: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            schema_identifier: schema_identifier.into(),
            path: path.into(),
        }
    }

    pub fn matches(&self, schema_identifier: &str) -> bool {
        self.schema_identifier.eq_ignore_ascii_case(schema_identifier)
    }
}

const BUILT_IN_PATHS: [(&str, &str); 3] = [
    (identifiers::CORE2_ENTERPRISE_USER, ProtocolConstants::PATH_USERS),
    (identifiers::CORE2_USER, ProtocolConstants::PATH_USERS),
    (identifiers::CORE2_GROUP, ProtocolConstants::PATH_GROUPS),
];

/// The collection segment serving `schema_identifier`.
///
/// Registered extensions win over the built-in User and Group collections.
pub fn path_for<'a>(
    schema_identifier: &str,
    extensions: &'a [SchemaExtension],
) -> ScimResult<&'a str> {
    if let Some(extension) = extensions
        .iter()
        .find(|extension| extension.matches(schema_identifier))
    {
        return Ok(&extension.path);
    }
    BUILT_IN_PATHS
        .iter()
        .find(|(schema, _)| schema.eq_ignore_ascii_case(schema_identifier))
        .map(|(_, path)| *path)
        .ok_or_else(|| ScimError::UnsupportedType(schema_identifier.to_string()))
}

/// The collection of `resource`: the first of its schemas with a known path,
/// falling back to the collection of its kind.
pub fn collection_path<'a, R: ResourceKind>(
    resource: &R,
    extensions: &'a [SchemaExtension],
) -> &'a str {
    resource
        .resource()
        .schemas
        .iter()
        .find_map(|schema| path_for(schema, extensions).ok())
        .unwrap_or(R::BASE_COLLECTION)
}

/// `{base}/{collection}`.
pub fn type_uri<R: ResourceKind>(
    resource: &R,
    base_uri: &Url,
    extensions: &[SchemaExtension],
) -> Url {
    let mut uri = base_uri.clone();
    if let Ok(mut segments) = uri.path_segments_mut() {
        segments.pop_if_empty().push(collection_path(resource, extensions));
    }
    uri
}

/// `{base}/{collection}/{id}`, with the identifier percent-encoded.
pub fn resource_uri<R: ResourceKind>(
    resource: &R,
    base_uri: &Url,
    extensions: &[SchemaExtension],
) -> ScimResult<Url> {
    let identifier = resource.identifier().ok_or_else(|| ScimError::InvalidResource {
        message: format!("{} has no identifier to address", R::RESOURCE_TYPE),
    })?;

    let mut uri = type_uri(resource, base_uri, extensions);
    uri.path_segments_mut()
        .map_err(|_| ScimError::InvalidResource {
            message: format!("'{}' cannot be used as a base URI", base_uri),
        })?
        .push(identifier);
    Ok(uri)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{Core2Group, Core2User};

    fn base() -> Url {
        Url::parse("https://example.com/scim/v2/").unwrap()
    }

    #[test]
    fn test_built_in_paths() {
        assert_eq!(path_for(identifiers::CORE2_USER, &[]).unwrap(), "Users");
        assert_eq!(path_for(identifiers::CORE2_ENTERPRISE_USER, &[]).unwrap(), "Users");
        assert_eq!(path_for(identifiers::CORE2_GROUP, &[]).unwrap(), "Groups");
    }

    #[test]
    fn test_extension_wins() {
        let extensions = [SchemaExtension::new(identifiers::CORE2_GROUP, "Teams")];
        assert_eq!(path_for(identifiers::CORE2_GROUP, &extensions).unwrap(), "Teams");
        assert_eq!(
            path_for("urn:example:Device", &[SchemaExtension::new("urn:example:device", "Devices")])
                .unwrap(),
            "Devices"
        );
    }

    #[test]
    fn test_unknown_schema() {
        let error = path_for("urn:example:Device", &[]).unwrap_err();
        assert!(matches!(error, ScimError::UnsupportedType(_)));
        assert_eq!(error.status(), 400);
    }

    #[test]
    fn test_resource_uri() {
        let mut user = Core2User::with_user_name("bjensen");
        user.resource.id = Some("2819c223 7f76".to_string());
        assert_eq!(
            resource_uri(&user, &base(), &[]).unwrap().as_str(),
            "https://example.com/scim/v2/Users/2819c223%207f76"
        );
    }

    #[test]
    fn test_resource_uri_needs_identifier() {
        let group = Core2Group::with_display_name("Admins");
        assert!(matches!(
            resource_uri(&group, &base(), &[]),
            Err(ScimError::InvalidResource { .. })
        ));
    }

    #[test]
    fn test_type_uri_without_trailing_slash() {
        let group = Core2Group::new();
        let base = Url::parse("https://example.com/scim/v2").unwrap();
        assert_eq!(
            type_uri(&group, &base, &[]).as_str(),
            "https://example.com/scim/v2/Groups"
        );
    }

    #[test]
    fn test_collection_path_falls_back_to_kind() {
        let mut group = Core2Group::new();
        group.resource = crate::resource::Resource::new("urn:example:Unknown");
        assert_eq!(collection_path(&group, &[]), "Groups");
    }
}
