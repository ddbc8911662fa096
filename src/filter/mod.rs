//! Filter and attribute path expressions (RFC 7644 §3.4.2.2, §3.5.2).
//!
//! A parsed filter is a list of alternates (logical OR). Each alternate is an
//! AND chain of comparisons linked through [`Filter::additional_filter`].
//! Parenthesised groups are distributed into this shape while parsing, so
//! `a eq 1 and (b eq 2 or c eq 3)` becomes the two alternates
//! `a eq 1 and b eq 2` and `a eq 1 and c eq 3`.
//!
//! ```rust
//! use scim_core::filter::{ComparisonOperator, Filter};
//!
//! let alternates = Filter::parse(r#"userName eq "bjensen" or active eq true"#).unwrap();
//! assert_eq!(alternates.len(), 2);
//! assert_eq!(alternates[0].attribute_path, "userName");
//! assert_eq!(alternates[1].operator, ComparisonOperator::Equals);
//! assert_eq!(alternates[1].comparison_value.as_deref(), Some("true"));
//! ```

pub mod evaluate;
pub(crate) mod lexer;
pub mod operator;
mod parser;
pub mod path;

pub use evaluate::{FilterTarget, compare_values, matches_any};
pub use operator::ComparisonOperator;
pub use path::Path;

use std::fmt;
use thiserror::Error;

/// Errors raised while parsing or applying a filter.
///
/// Every variant is reported to clients as `invalidFilter` (400).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("Unsupported operator '{operator}' for attribute '{attribute}'")]
    UnsupportedOperator { operator: String, attribute: String },

    #[error("Unsupported attribute path '{path}'")]
    UnsupportedAttributePath { path: String },

    #[error("Invalid filter syntax at position {position}: {message}")]
    InvalidSyntax { message: String, position: usize },

    #[error("Invalid comparison value for '{attribute}': {message}")]
    InvalidComparisonValue { attribute: String, message: String },

    #[error("Filter expands to more than {limit} alternates")]
    TooManyAlternates { limit: usize },
}

pub type FilterResult<T> = Result<T, FilterError>;

/// One comparison and the rest of its AND chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    /// Attribute path, possibly dotted or prefixed with a schema URN
    pub attribute_path: String,
    /// Bracketed condition an element of a multi-valued attribute must meet
    ///
    /// Set for `emails[type eq "work"]`; the operator is then
    /// [`ComparisonOperator::Present`].
    pub value_filter: Option<Box<Filter>>,
    pub operator: ComparisonOperator,
    /// Absent for `pr` and for a `null` literal
    pub comparison_value: Option<String>,
    /// Next comparison of the AND chain
    pub additional_filter: Option<Box<Filter>>,
}

impl Filter {
    pub fn new(
        attribute_path: impl Into<String>,
        operator: ComparisonOperator,
        comparison_value: Option<String>,
    ) -> Self {
        Self {
            attribute_path: attribute_path.into(),
            value_filter: None,
            operator,
            comparison_value,
            additional_filter: None,
        }
    }

    /// `attribute eq "value"`
    pub fn equals(attribute_path: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(
            attribute_path,
            ComparisonOperator::Equals,
            Some(value.into()),
        )
    }

    /// Parse a filter expression into its OR alternates.
    pub fn parse(expression: &str) -> FilterResult<Vec<Filter>> {
        parser::parse_filter(expression)
    }

    /// Append `other` (and its chain) to the end of this AND chain.
    pub fn and(mut self, other: Filter) -> Self {
        let tail = match self.additional_filter.take() {
            Some(next) => (*next).and(other),
            None => other,
        };
        self.additional_filter = Some(Box::new(tail));
        self
    }

    /// Iterate over the comparisons of this AND chain, this one first.
    pub fn chain(&self) -> impl Iterator<Item = &Filter> {
        std::iter::successors(Some(self), |filter| filter.additional_filter.as_deref())
    }

    pub(crate) fn from_chain(mut items: Vec<Filter>) -> Option<Filter> {
        let mut chain: Option<Filter> = None;
        while let Some(mut item) = items.pop() {
            item.additional_filter = chain.map(Box::new);
            chain = Some(item);
        }
        chain
    }

    /// Whether this single comparison (ignoring the chain) targets `name`.
    pub fn targets(&self, name: &str) -> bool {
        self.attribute_path.eq_ignore_ascii_case(name)
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, filter) in self.chain().enumerate() {
            if index > 0 {
                f.write_str(" and ")?;
            }
            f.write_str(&filter.attribute_path)?;
            if let Some(value_filter) = &filter.value_filter {
                write!(f, "[{}]", value_filter)?;
                continue;
            }
            write!(f, " {}", filter.operator)?;
            if filter.operator.takes_value() {
                match &filter.comparison_value {
                    Some(value) => write!(
                        f,
                        " {}",
                        serde_json::to_string(value).map_err(|_| fmt::Error)?
                    )?,
                    None => f.write_str(" null")?,
                }
            }
        }
        Ok(())
    }
}
