//! Attribute selection for responses (`attributes` / `excludedAttributes`).

use crate::resource::core::ResourceKind;
use crate::schema::{Returned, catalog};
use serde_json::{Map, Value};

const ALWAYS_RETURNED: &[&str] = &["id", "schemas"];

/// One entry of an `attributes` or `excludedAttributes` list, split into the
/// top-level JSON key and an optional sub-attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Selector {
    key: String,
    sub_attribute: Option<String>,
}

impl Selector {
    fn parse(core_schema: &str, raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        // `urn:...:User:name.givenName` or `urn:...:enterprise:2.0:User:department`
        let (key, rest) = match raw.rfind(':') {
            Some(index) if raw[..index].to_ascii_lowercase().starts_with("urn:") => {
                let (urn, path) = (&raw[..index], &raw[index + 1..]);
                if urn.eq_ignore_ascii_case(core_schema) {
                    split_dotted(path)
                } else {
                    (urn.to_string(), Some(path.to_string()))
                }
            }
            _ => split_dotted(raw),
        };

        Some(Self {
            key,
            sub_attribute: rest.filter(|sub| !sub.is_empty()),
        })
    }
}

fn split_dotted(path: &str) -> (String, Option<String>) {
    match path.split_once('.') {
        Some((head, tail)) => (head.to_string(), Some(tail.to_string())),
        None => (path.to_string(), None),
    }
}

fn find_key(object: &Map<String, Value>, wanted: &str) -> Option<String> {
    object
        .keys()
        .find(|key| key.eq_ignore_ascii_case(wanted))
        .cloned()
}

/// Serialize `resource` honouring the requested attribute selection.
///
/// `id` and `schemas` are always present. Attributes whose schema definition
/// says they are never returned (such as `password`) are always removed.
/// When `attributes` is non-empty it wins over `excluded_attributes`.
pub fn project<R: ResourceKind>(
    resource: &R,
    attributes: &[String],
    excluded_attributes: &[String],
) -> Result<Value, serde_json::Error> {
    let mut document = serde_json::to_value(resource)?;
    let Some(object) = document.as_object_mut() else {
        return Ok(document);
    };

    if let Some(scheme) = catalog::schema(R::SCHEMA) {
        for attribute in scheme.attributes() {
            if attribute.returned == Returned::Never {
                if let Some(key) = find_key(object, &attribute.name) {
                    object.remove(&key);
                }
            }
        }
    }

    if !attributes.is_empty() {
        let selectors: Vec<Selector> = attributes
            .iter()
            .filter_map(|raw| Selector::parse(R::SCHEMA, raw))
            .collect();
        retain_selected(object, &selectors);
    } else if !excluded_attributes.is_empty() {
        for selector in excluded_attributes
            .iter()
            .filter_map(|raw| Selector::parse(R::SCHEMA, raw))
        {
            remove_selected(object, &selector);
        }
    }

    Ok(document)
}

fn retain_selected(object: &mut Map<String, Value>, selectors: &[Selector]) {
    let keys: Vec<String> = object.keys().cloned().collect();
    for key in keys {
        if ALWAYS_RETURNED.iter().any(|always| key.eq_ignore_ascii_case(always)) {
            continue;
        }
        let matching: Vec<&Selector> = selectors
            .iter()
            .filter(|selector| selector.key.eq_ignore_ascii_case(&key))
            .collect();
        if matching.is_empty() {
            object.remove(&key);
            continue;
        }
        // A bare selector keeps the whole attribute.
        if matching.iter().any(|selector| selector.sub_attribute.is_none()) {
            continue;
        }
        let wanted: Vec<&str> = matching
            .iter()
            .filter_map(|selector| selector.sub_attribute.as_deref())
            .collect();
        if let Some(value) = object.get_mut(&key) {
            retain_sub_attributes(value, &wanted);
        }
    }
}

fn retain_sub_attributes(value: &mut Value, wanted: &[&str]) {
    match value {
        Value::Object(inner) => {
            inner.retain(|name, _| wanted.iter().any(|sub| sub.eq_ignore_ascii_case(name)));
        }
        Value::Array(items) => {
            for item in items {
                retain_sub_attributes(item, wanted);
            }
        }
        _ => {}
    }
}

fn remove_selected(object: &mut Map<String, Value>, selector: &Selector) {
    if ALWAYS_RETURNED
        .iter()
        .any(|always| selector.key.eq_ignore_ascii_case(always))
    {
        return;
    }
    let Some(key) = find_key(object, &selector.key) else {
        return;
    };
    match selector.sub_attribute.as_deref() {
        None => {
            object.remove(&key);
        }
        Some(sub) => {
            if let Some(value) = object.get_mut(&key) {
                remove_sub_attribute(value, sub);
            }
        }
    }
}

fn remove_sub_attribute(value: &mut Value, sub: &str) {
    match value {
        Value::Object(inner) => inner.retain(|name, _| !name.eq_ignore_ascii_case(sub)),
        Value::Array(items) => {
            for item in items {
                remove_sub_attribute(item, sub);
            }
        }
        _ => {}
    }
}
