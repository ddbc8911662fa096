//! Filter evaluation over the stored User and Group resources.
//!
//! Only the comparisons listed in each kind's [`StoredResource::FILTERABLE`]
//! table are answered. Everything else is reported as an unsupported filter,
//! even when the store is empty.

use crate::filter::evaluate::{ordering_holds, required_value, unsupported};
use crate::filter::{
    ComparisonOperator, Filter, FilterError, FilterResult, FilterTarget, compare_values,
};
use crate::providers::in_memory::StoredResource;
use crate::resource::{Core2Group, Core2User, Resource, ResourceKind};
use crate::schema::catalog;
use chrono::{DateTime, Utc};

use ComparisonOperator::{Equals, GreaterThanOrEquals, LessThanOrEquals};

pub(super) const USER_FILTERS: &[(&str, &[ComparisonOperator])] = &[
    ("id", &[Equals]),
    ("userName", &[Equals]),
    ("externalId", &[Equals]),
    ("active", &[Equals]),
    ("displayName", &[Equals]),
    ("meta.lastModified", &[GreaterThanOrEquals, LessThanOrEquals]),
];

pub(super) const GROUP_FILTERS: &[(&str, &[ComparisonOperator])] = &[
    ("id", &[Equals]),
    ("displayName", &[Equals]),
    ("externalId", &[Equals]),
    ("members.value", &[Equals]),
    ("meta.lastModified", &[GreaterThanOrEquals, LessThanOrEquals]),
];

/// Reject every comparison of the AND chain at `filter` that `R` cannot
/// answer.
pub(super) fn check_supported<R: StoredResource>(filter: &Filter) -> FilterResult<()> {
    for comparison in filter.chain() {
        check_comparison::<R>(comparison)?;
    }
    Ok(())
}

fn check_comparison<R: StoredResource>(filter: &Filter) -> FilterResult<()> {
    if filter.attribute_path.trim().is_empty() || filter.value_filter.is_some() {
        return Err(unsupported_path(filter));
    }

    let name = local_name::<R>(&filter.attribute_path);
    let (_, operators) = R::FILTERABLE
        .iter()
        .find(|(attribute, _)| attribute.eq_ignore_ascii_case(name))
        .ok_or_else(|| unsupported_path(filter))?;

    if !operators.contains(&filter.operator) {
        return Err(unsupported(filter));
    }
    if filter.operator.takes_value() {
        required_value(filter)?;
    }
    Ok(())
}

fn unsupported_path(filter: &Filter) -> FilterError {
    FilterError::UnsupportedAttributePath {
        path: filter.attribute_path.clone(),
    }
}

/// Strip a leading `{core schema}:` qualifier.
fn local_name<R: ResourceKind>(attribute_path: &str) -> &str {
    attribute_path
        .get(..R::SCHEMA.len())
        .filter(|head| head.eq_ignore_ascii_case(R::SCHEMA))
        .and_then(|_| attribute_path[R::SCHEMA.len()..].strip_prefix(':'))
        .unwrap_or(attribute_path)
}

fn case_exact(schema: &str, attribute: &str) -> bool {
    match catalog::attribute(schema, attribute) {
        Some(definition) => definition.case_exact,
        // id is not declared by the core schemas but is case exact
        None => attribute == "id",
    }
}

fn text(
    filter: &Filter,
    actual: Option<&str>,
    schema: &str,
    attribute: &str,
) -> FilterResult<bool> {
    match actual {
        Some(actual) => compare_values(filter, actual, case_exact(schema, attribute)),
        None => Ok(false),
    }
}

fn boolean(filter: &Filter, actual: Option<bool>) -> FilterResult<bool> {
    let expected = match required_value(filter)?.to_ascii_lowercase().as_str() {
        "true" => true,
        "false" => false,
        other => {
            return Err(FilterError::InvalidComparisonValue {
                attribute: filter.attribute_path.clone(),
                message: format!("'{}' is not a boolean", other),
            });
        }
    };
    Ok(actual == Some(expected))
}

fn timestamp(filter: &Filter, resource: &Resource) -> FilterResult<bool> {
    let raw = required_value(filter)?;
    let expected = DateTime::parse_from_rfc3339(raw)
        .map_err(|e| FilterError::InvalidComparisonValue {
            attribute: filter.attribute_path.clone(),
            message: format!("'{}' is not an RFC 3339 timestamp: {}", raw, e),
        })?
        .with_timezone(&Utc);

    let Some(actual) = resource.meta.as_ref().and_then(|meta| meta.last_modified) else {
        return Ok(false);
    };
    ordering_holds(filter.operator, actual.cmp(&expected)).ok_or_else(|| unsupported(filter))
}

impl FilterTarget for Core2User {
    fn evaluate(&self, filter: &Filter) -> FilterResult<bool> {
        check_comparison::<Self>(filter)?;

        match local_name::<Self>(&filter.attribute_path)
            .to_ascii_lowercase()
            .as_str()
        {
            "id" => text(filter, self.resource.identifier(), Self::SCHEMA, "id"),
            "username" => text(filter, self.user_name.as_deref(), Self::SCHEMA, "userName"),
            "externalid" => text(
                filter,
                self.resource.external_id.as_deref(),
                Self::SCHEMA,
                "externalId",
            ),
            "displayname" => text(
                filter,
                self.display_name.as_deref(),
                Self::SCHEMA,
                "displayName",
            ),
            "active" => boolean(filter, self.active),
            "meta.lastmodified" => timestamp(filter, &self.resource),
            _ => Err(unsupported_path(filter)),
        }
    }
}

impl FilterTarget for Core2Group {
    fn evaluate(&self, filter: &Filter) -> FilterResult<bool> {
        check_comparison::<Self>(filter)?;

        match local_name::<Self>(&filter.attribute_path)
            .to_ascii_lowercase()
            .as_str()
        {
            "id" => text(filter, self.resource.identifier(), Self::SCHEMA, "id"),
            "displayname" => text(
                filter,
                self.display_name.as_deref(),
                Self::SCHEMA,
                "displayName",
            ),
            "externalid" => text(
                filter,
                self.resource.external_id.as_deref(),
                Self::SCHEMA,
                "externalId",
            ),
            "members.value" => {
                let case_exact = case_exact(Self::SCHEMA, "members.value");
                for member in &self.members {
                    if compare_values(filter, &member.value, case_exact)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            "meta.lastmodified" => timestamp(filter, &self.resource),
            _ => Err(unsupported_path(filter)),
        }
    }
}
