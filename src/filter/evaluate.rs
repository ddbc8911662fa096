//! Applying parsed filters to resources.

use crate::filter::{ComparisonOperator, Filter, FilterError, FilterResult};
use std::cmp::Ordering;

/// Something a filter can be evaluated against.
///
/// Implementors decide which attribute paths and operators they support and
/// report anything else as a [`FilterError`].
pub trait FilterTarget {
    /// Evaluate one comparison, ignoring its AND chain.
    fn evaluate(&self, filter: &Filter) -> FilterResult<bool>;

    /// Whether every comparison of the AND chain starting at `filter` holds.
    fn matches(&self, filter: &Filter) -> FilterResult<bool> {
        for comparison in filter.chain() {
            if !self.evaluate(comparison)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// Whether any of the OR alternates matches. No alternates matches everything.
pub fn matches_any<T: FilterTarget + ?Sized>(
    target: &T,
    alternates: &[Filter],
) -> FilterResult<bool> {
    if alternates.is_empty() {
        return Ok(true);
    }
    for alternate in alternates {
        if target.matches(alternate)? {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Compare a present string attribute value against `filter`.
///
/// Handles `eq ne co sw ew gt ge lt le pr`. The extended operators are
/// reported as unsupported.
pub fn compare_values(filter: &Filter, actual: &str, case_exact: bool) -> FilterResult<bool> {
    if filter.operator == ComparisonOperator::Present {
        return Ok(true);
    }

    let expected = required_value(filter)?;
    let (actual, expected) = if case_exact {
        (actual.to_string(), expected.to_string())
    } else {
        (actual.to_lowercase(), expected.to_lowercase())
    };

    let result = match filter.operator {
        ComparisonOperator::Equals => actual == expected,
        ComparisonOperator::NotEquals => actual != expected,
        ComparisonOperator::Contains => actual.contains(&expected),
        ComparisonOperator::StartsWith => actual.starts_with(&expected),
        ComparisonOperator::EndsWith => actual.ends_with(&expected),
        operator => match ordering_holds(operator, actual.cmp(&expected)) {
            Some(result) => result,
            None => return Err(unsupported(filter)),
        },
    };
    Ok(result)
}

/// Whether `ordering` (actual compared with expected) satisfies an ordering
/// operator. `None` for operators that are not orderings.
pub(crate) fn ordering_holds(operator: ComparisonOperator, ordering: Ordering) -> Option<bool> {
    match operator {
        ComparisonOperator::GreaterThan => Some(ordering == Ordering::Greater),
        ComparisonOperator::GreaterThanOrEquals => Some(ordering != Ordering::Less),
        ComparisonOperator::LessThan => Some(ordering == Ordering::Less),
        ComparisonOperator::LessThanOrEquals => Some(ordering != Ordering::Greater),
        _ => None,
    }
}

/// The comparison value of `filter`, which must be present and non-empty.
pub(crate) fn required_value(filter: &Filter) -> FilterResult<&str> {
    filter
        .comparison_value
        .as_deref()
        .filter(|value| !value.is_empty())
        .ok_or_else(|| FilterError::InvalidComparisonValue {
            attribute: filter.attribute_path.clone(),
            message: format!("operator '{}' requires a comparison value", filter.operator),
        })
}

pub(crate) fn unsupported(filter: &Filter) -> FilterError {
    FilterError::UnsupportedOperator {
        operator: filter.operator.keyword().to_string(),
        attribute: filter.attribute_path.clone(),
    }
}
