//! Building blocks shared by the resource patch implementations.

use crate::filter::{ComparisonOperator, Path};
use crate::patch::operation::scalar_text;
use crate::patch::{
    OperationName, PatchError, PatchOperation, PatchOutcome, PatchResult, PatchValue,
};
use crate::resource::{Member, TypedValue};
use crate::schema::catalog;
use log::debug;
use serde_json::{Map, Value};

/// Whether the catalog marks `attribute` of `schema` as required.
pub(super) fn is_required(schema: &str, attribute: &str) -> bool {
    catalog::attribute(schema, attribute).is_some_and(|scheme| scheme.required)
}

pub(super) fn ignored(
    resource_type: &str,
    operation: &PatchOperation,
) -> PatchResult<PatchOutcome> {
    debug!(
        "Ignoring patch {} of unknown target '{}' on {}",
        operation.op,
        operation.target(),
        resource_type
    );
    Ok(PatchOutcome::Ignored)
}

/// Set, replace or clear a single-valued string attribute.
///
/// A remove carrying a value only clears the attribute when the value matches
/// the current one, ignoring case.
pub(super) fn patch_scalar(
    target: &mut Option<String>,
    operation: &PatchOperation,
    required: bool,
) -> PatchResult<PatchOutcome> {
    match operation.op {
        OperationName::Add | OperationName::Replace => {
            *target = Some(operation.required_value()?);
        }
        OperationName::Remove => {
            if let Some(value) = operation.single_value()? {
                let matches = target
                    .as_deref()
                    .is_some_and(|current| current.eq_ignore_ascii_case(&value));
                if !matches {
                    return Ok(PatchOutcome::Applied);
                }
            }
            if required {
                return Err(PatchError::invalid_value(
                    operation.target(),
                    "a required attribute cannot be removed",
                ));
            }
            *target = None;
        }
    }
    Ok(PatchOutcome::Applied)
}

pub(super) fn patch_boolean(
    target: &mut Option<bool>,
    operation: &PatchOperation,
) -> PatchResult<PatchOutcome> {
    match operation.op {
        OperationName::Add | OperationName::Replace => {
            *target = Some(parse_boolean(operation, &operation.required_value()?)?);
        }
        OperationName::Remove => {
            if let Some(value) = operation.single_value()? {
                if *target != Some(parse_boolean(operation, &value)?) {
                    return Ok(PatchOutcome::Applied);
                }
            }
            *target = None;
        }
    }
    Ok(PatchOutcome::Applied)
}

fn parse_boolean(operation: &PatchOperation, value: &str) -> PatchResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(PatchError::invalid_value(
            operation.target(),
            format!("'{}' is not a boolean", value),
        )),
    }
}

/// Untyped multi-valued `members`, identified by case-insensitive `value`.
pub(super) fn patch_members(
    members: &mut Vec<Member>,
    operation: &PatchOperation,
) -> PatchResult<PatchOutcome> {
    match operation.op {
        OperationName::Add | OperationName::Replace => {
            let incoming = operation
                .value
                .as_ref()
                .map(PatchValue::objects)
                .unwrap_or_default();
            if incoming.is_empty() {
                return Err(PatchError::invalid_value(
                    operation.target(),
                    format!("'{}' requires at least one member", operation.op),
                ));
            }
            let incoming = incoming
                .iter()
                .map(|object| member_from(operation, object))
                .collect::<PatchResult<Vec<_>>>()?;
            if operation.op == OperationName::Replace {
                members.clear();
            }
            for member in incoming {
                if !members.iter().any(|existing| existing.same_member(&member.value)) {
                    members.push(member);
                }
            }
        }
        OperationName::Remove => {
            let values = operation.values();
            if values.is_empty() {
                members.clear();
            } else {
                members.retain(|member| {
                    !values
                        .iter()
                        .filter_map(|value| value.value.as_deref())
                        .any(|value| member.same_member(value))
                });
            }
        }
    }
    Ok(PatchOutcome::Applied)
}

fn member_from(operation: &PatchOperation, object: &Map<String, Value>) -> PatchResult<Member> {
    let text = |key: &str| object.get(key).and_then(scalar_text);
    let value = text("value").filter(|value| !value.is_empty()).ok_or_else(|| {
        PatchError::invalid_value(operation.target(), "a member needs a 'value'")
    })?;
    Ok(Member {
        value,
        kind: text("type"),
        display: text("display"),
        reference: text("$ref"),
    })
}

/// A typed multi-valued attribute such as `emails`.
///
/// With a `[type eq "T"]` filter the operation addresses the single slot of
/// type `T`. Without one, the carried items are merged by type.
pub(super) fn patch_typed(
    items: &mut Vec<TypedValue>,
    operation: &PatchOperation,
    path: &Path,
    schema: &str,
) -> PatchResult<PatchOutcome> {
    if path.sub_attributes.is_empty() {
        if path.value_path.is_some() {
            return Err(PatchError::invalid_path(
                path,
                "a sub-attribute of a multi-valued attribute needs a type filter",
            ));
        }
        return merge_typed(items, operation);
    }

    let kind = slot_type(path)?;
    let canonical = catalog::attribute(schema, &format!("{}.type", path.attribute_path))
        .map(|scheme| scheme.canonical_values())
        .unwrap_or_default();
    if !canonical.is_empty() && !canonical.iter().any(|known| known.eq_ignore_ascii_case(&kind)) {
        return Err(PatchError::invalid_value(
            path,
            format!("'{}' is not a known type", kind),
        ));
    }
    match path.value_path_name() {
        None => {}
        Some(name) if name.eq_ignore_ascii_case("value") => {}
        Some(name) => {
            return Err(PatchError::invalid_path(
                path,
                format!("'{}' cannot be patched on a typed slot", name),
            ));
        }
    }

    let slot = items.iter().position(|item| item.is_kind(&kind));
    match operation.op {
        OperationName::Add => {
            let value = operation.required_value()?;
            if slot.is_some() {
                debug!("Slot '{}' of {} already exists, add ignored", kind, path.attribute_path);
                return Ok(PatchOutcome::Ignored);
            }
            items.push(TypedValue::new(kind, value));
        }
        OperationName::Replace => {
            let value = operation.required_value()?;
            match slot {
                Some(index) => items[index].value = Some(value),
                None => items.push(TypedValue::new(kind, value)),
            }
        }
        OperationName::Remove => {
            let expected = operation.single_value()?;
            items.retain(|item| {
                let same_value = match &expected {
                    Some(expected) => item
                        .value
                        .as_deref()
                        .is_some_and(|value| value.eq_ignore_ascii_case(expected)),
                    None => true,
                };
                !(item.is_kind(&kind) && same_value)
            });
        }
    }
    Ok(PatchOutcome::Applied)
}

/// The `T` of a path filtered by exactly `[type eq "T"]`.
fn slot_type(path: &Path) -> PatchResult<String> {
    path.single_sub_filter()
        .filter(|filter| filter.targets("type") && filter.operator == ComparisonOperator::Equals)
        .and_then(|filter| filter.comparison_value.clone())
        .ok_or_else(|| {
            PatchError::invalid_path(
                path,
                "expected exactly one filter of the form type eq \"...\"",
            )
        })
}

fn merge_typed(
    items: &mut Vec<TypedValue>,
    operation: &PatchOperation,
) -> PatchResult<PatchOutcome> {
    let incoming: Vec<TypedValue> = operation
        .value
        .as_ref()
        .map(PatchValue::objects)
        .unwrap_or_default()
        .iter()
        .map(typed_from)
        .collect();

    match operation.op {
        OperationName::Add | OperationName::Replace => {
            if incoming.is_empty() {
                return Err(PatchError::invalid_value(
                    operation.target(),
                    format!("'{}' requires a value", operation.op),
                ));
            }
            if operation.op == OperationName::Replace {
                items.clear();
            }
            for item in incoming {
                let existing = item
                    .kind
                    .as_deref()
                    .and_then(|kind| items.iter().position(|current| current.is_kind(kind)));
                match existing {
                    Some(index) => items[index] = item,
                    None if !items.contains(&item) => items.push(item),
                    None => {}
                }
            }
        }
        OperationName::Remove => {
            if incoming.is_empty() {
                items.clear();
            } else {
                items.retain(|item| {
                    !incoming.iter().any(|removed| {
                        removed
                            .value
                            .as_deref()
                            .zip(item.value.as_deref())
                            .is_some_and(|(left, right)| left.eq_ignore_ascii_case(right))
                    })
                });
            }
        }
    }
    Ok(PatchOutcome::Applied)
}

fn typed_from(object: &Map<String, Value>) -> TypedValue {
    let text = |key: &str| object.get(key).and_then(scalar_text);
    TypedValue {
        value: text("value"),
        display: text("display"),
        kind: text("type"),
        primary: object.get("primary").and_then(|primary| match primary {
            Value::Bool(flag) => Some(*flag),
            Value::String(text) => text.parse().ok(),
            _ => None,
        }),
    }
}

/// Split a path-less object value into one operation per key.
///
/// Keys naming a schema URN with an object value are expanded with the URN as
/// the schema prefix of each inner key.
pub(super) fn expand_object(operation: &PatchOperation) -> PatchResult<Vec<PatchOperation>> {
    if operation.op == OperationName::Remove {
        return Err(PatchError::NoTarget {
            operation: operation.op.to_string(),
        });
    }
    let Some(PatchValue::Object(object)) = &operation.value else {
        return Err(PatchError::invalid_value(
            "",
            format!("'{}' without a path requires an object value", operation.op),
        ));
    };

    let mut expanded = Vec::with_capacity(object.len());
    for (key, value) in object {
        if catalog::schema(key).is_some() {
            if let Value::Object(inner) = value {
                for (inner_key, inner_value) in inner {
                    expanded.push(PatchOperation::new(
                        operation.op,
                        Some(&format!("{}:{}", key, inner_key)),
                        Some(inner_value.clone()),
                    )?);
                }
                continue;
            }
        }
        if key.eq_ignore_ascii_case("schemas") {
            continue;
        }
        expanded.push(PatchOperation::new(
            operation.op,
            Some(key),
            Some(value.clone()),
        )?);
    }
    Ok(expanded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::identifiers;
    use serde_json::json;

    fn operation(op: OperationName, path: &str, value: Option<Value>) -> PatchOperation {
        PatchOperation::new(op, Some(path), value).unwrap()
    }

    #[test]
    fn test_scalar_remove_with_mismatched_value_is_noop() {
        let mut title = Some("Boss".to_string());
        let remove = operation(OperationName::Remove, "title", Some(json!("Clerk")));
        patch_scalar(&mut title, &remove, false).unwrap();
        assert_eq!(title.as_deref(), Some("Boss"));

        let remove = operation(OperationName::Remove, "title", Some(json!("boss")));
        patch_scalar(&mut title, &remove, false).unwrap();
        assert_eq!(title, None);
    }

    #[test]
    fn test_required_scalar_cannot_be_removed() {
        let mut user_name = Some("bjensen".to_string());
        let remove = operation(OperationName::Remove, "userName", None);
        assert!(matches!(
            patch_scalar(&mut user_name, &remove, true),
            Err(PatchError::InvalidValue { .. })
        ));
        assert_eq!(user_name.as_deref(), Some("bjensen"));
    }

    #[test]
    fn test_boolean_values() {
        let mut active = None;
        let replace = operation(OperationName::Replace, "active", Some(json!("False")));
        patch_boolean(&mut active, &replace).unwrap();
        assert_eq!(active, Some(false));

        let add = operation(OperationName::Add, "active", Some(json!("maybe")));
        assert!(patch_boolean(&mut active, &add).is_err());
    }

    #[test]
    fn test_members_add_is_a_union() {
        let mut members = vec![Member::new("a"), Member::new("b")];
        let add = operation(
            OperationName::Add,
            "members",
            Some(json!([{"value": "A"}, {"value": "c"}, {"value": "c"}])),
        );
        patch_members(&mut members, &add).unwrap();
        let values: Vec<&str> = members.iter().map(|member| member.value.as_str()).collect();
        assert_eq!(values, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_member_without_value_is_rejected() {
        let mut members = Vec::new();
        let add = operation(OperationName::Add, "members", Some(json!([{"display": "x"}])));
        assert!(patch_members(&mut members, &add).is_err());
    }

    #[test]
    fn test_typed_slot() {
        let mut emails = vec![TypedValue::new("work", "a@example.com")];
        let path = Path::parse(r#"emails[type eq "work"].value"#).unwrap();

        let add = operation(OperationName::Add, &path.to_string(), Some(json!("b@example.com")));
        assert_eq!(
            patch_typed(&mut emails, &add, &path, identifiers::CORE2_USER).unwrap(),
            PatchOutcome::Ignored
        );
        assert_eq!(emails[0].value.as_deref(), Some("a@example.com"));

        let replace = operation(
            OperationName::Replace,
            &path.to_string(),
            Some(json!("b@example.com")),
        );
        patch_typed(&mut emails, &replace, &path, identifiers::CORE2_USER).unwrap();
        assert_eq!(emails[0].value.as_deref(), Some("b@example.com"));

        let remove = operation(
            OperationName::Remove,
            &path.to_string(),
            Some(json!("other@example.com")),
        );
        patch_typed(&mut emails, &remove, &path, identifiers::CORE2_USER).unwrap();
        assert_eq!(emails.len(), 1);

        let remove = operation(OperationName::Remove, &path.to_string(), None);
        patch_typed(&mut emails, &remove, &path, identifiers::CORE2_USER).unwrap();
        assert!(emails.is_empty());
    }

    #[test]
    fn test_typed_slot_rejects_unknown_type() {
        let mut emails = Vec::new();
        let path = Path::parse(r#"emails[type eq "pigeon"].value"#).unwrap();
        let add = operation(OperationName::Add, &path.to_string(), Some(json!("x")));
        assert!(matches!(
            patch_typed(&mut emails, &add, &path, identifiers::CORE2_USER),
            Err(PatchError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_typed_slot_needs_type_filter() {
        let mut emails = Vec::new();
        let path = Path::parse(r#"emails[value eq "x"].value"#).unwrap();
        let add = operation(OperationName::Add, &path.to_string(), Some(json!("x")));
        assert!(matches!(
            patch_typed(&mut emails, &add, &path, identifiers::CORE2_USER),
            Err(PatchError::InvalidPath { .. })
        ));
    }

    #[test]
    fn test_typed_list_merges_by_type() {
        let mut emails = vec![TypedValue::new("work", "a@example.com")];
        let path = Path::new("emails");
        let add = operation(
            OperationName::Add,
            "emails",
            Some(json!([
                {"type": "work", "value": "b@example.com", "primary": true},
                {"type": "home", "value": "c@example.com"}
            ])),
        );
        patch_typed(&mut emails, &add, &path, identifiers::CORE2_USER).unwrap();
        assert_eq!(emails.len(), 2);
        assert_eq!(emails[0].value.as_deref(), Some("b@example.com"));
        assert_eq!(emails[0].primary, Some(true));
        assert!(emails[1].is_kind("home"));
    }

    #[test]
    fn test_expand_object() {
        let replace = PatchOperation::new(
            OperationName::Replace,
            None,
            Some(json!({
                "displayName": "Babs",
                "urn:ietf:params:scim:schemas:extension:enterprise:2.0:User": {"department": "Tour"}
            })),
        )
        .unwrap();
        let expanded = expand_object(&replace).unwrap();
        let targets: Vec<String> = expanded.iter().map(PatchOperation::target).collect();
        assert!(targets.contains(&"displayName".to_string()));
        assert!(targets.contains(
            &"urn:ietf:params:scim:schemas:extension:enterprise:2.0:User:department".to_string()
        ));
    }

    #[test]
    fn test_pathless_remove_has_no_target() {
        let remove = PatchOperation::new(OperationName::Remove, None, None).unwrap();
        assert!(matches!(
            expand_object(&remove),
            Err(PatchError::NoTarget { .. })
        ));
    }
}
