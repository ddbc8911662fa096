//! Comparison operators of filter expressions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Comparison operators: the RFC 7644 §3.4.2.2 set plus the extended
/// operators some identity providers send.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ComparisonOperator {
    /// Equal comparison
    #[serde(rename = "eq")]
    Equals,

    /// Not equal comparison
    #[serde(rename = "ne")]
    NotEquals,

    /// Contains operation for strings
    #[serde(rename = "co")]
    Contains,

    /// Starts with operation for strings
    #[serde(rename = "sw")]
    StartsWith,

    /// Ends with operation for strings
    #[serde(rename = "ew")]
    EndsWith,

    /// Present (attribute exists)
    #[serde(rename = "pr")]
    Present,

    /// Greater than
    #[serde(rename = "gt")]
    GreaterThan,

    /// Greater than or equal
    #[serde(rename = "ge")]
    GreaterThanOrEquals,

    /// Less than
    #[serde(rename = "lt")]
    LessThan,

    /// Less than or equal
    #[serde(rename = "le")]
    LessThanOrEquals,

    #[serde(rename = "bitAnd")]
    BitAnd,

    #[serde(rename = "notBitAnd")]
    NotBitAnd,

    #[serde(rename = "includes")]
    Includes,

    #[serde(rename = "isMemberOf")]
    IsMemberOf,

    #[serde(rename = "matchesExpression")]
    MatchesExpression,

    #[serde(rename = "notMatchesExpression")]
    NotMatchesExpression,
}

impl ComparisonOperator {
    pub const ALL: [ComparisonOperator; 16] = [
        ComparisonOperator::Equals,
        ComparisonOperator::NotEquals,
        ComparisonOperator::Contains,
        ComparisonOperator::StartsWith,
        ComparisonOperator::EndsWith,
        ComparisonOperator::Present,
        ComparisonOperator::GreaterThan,
        ComparisonOperator::GreaterThanOrEquals,
        ComparisonOperator::LessThan,
        ComparisonOperator::LessThanOrEquals,
        ComparisonOperator::BitAnd,
        ComparisonOperator::NotBitAnd,
        ComparisonOperator::Includes,
        ComparisonOperator::IsMemberOf,
        ComparisonOperator::MatchesExpression,
        ComparisonOperator::NotMatchesExpression,
    ];

    /// The operator keyword as written in filter expressions.
    pub fn keyword(self) -> &'static str {
        match self {
            ComparisonOperator::Equals => "eq",
            ComparisonOperator::NotEquals => "ne",
            ComparisonOperator::Contains => "co",
            ComparisonOperator::StartsWith => "sw",
            ComparisonOperator::EndsWith => "ew",
            ComparisonOperator::Present => "pr",
            ComparisonOperator::GreaterThan => "gt",
            ComparisonOperator::GreaterThanOrEquals => "ge",
            ComparisonOperator::LessThan => "lt",
            ComparisonOperator::LessThanOrEquals => "le",
            ComparisonOperator::BitAnd => "bitAnd",
            ComparisonOperator::NotBitAnd => "notBitAnd",
            ComparisonOperator::Includes => "includes",
            ComparisonOperator::IsMemberOf => "isMemberOf",
            ComparisonOperator::MatchesExpression => "matchesExpression",
            ComparisonOperator::NotMatchesExpression => "notMatchesExpression",
        }
    }

    /// Whether the operator takes a comparison value.
    pub fn takes_value(self) -> bool {
        self != ComparisonOperator::Present
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for ComparisonOperator {
    type Err = ();

    /// Keywords are matched case-insensitively.
    fn from_str(keyword: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|operator| operator.keyword().eq_ignore_ascii_case(keyword))
            .ok_or(())
    }
}
