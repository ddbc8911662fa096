//! Patch target paths such as `emails[type eq "work"].value`.

use crate::filter::{Filter, FilterError, FilterResult};
use crate::schema::catalog;
use std::fmt;

/// A parsed patch target.
///
/// `urn:...:User:emails[type eq "work"].value` has the schema identifier
/// `urn:...:User`, the attribute path `emails`, one sub-attribute filter and
/// the value path `value`. A dotted path like `name.givenName` is held as
/// `name` with the value path `givenName`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    pub schema_identifier: Option<String>,
    /// Empty when the path names a whole schema extension
    pub attribute_path: String,
    /// OR alternates of the bracketed filter, empty without brackets
    pub sub_attributes: Vec<Filter>,
    pub value_path: Option<Box<Path>>,
}

impl Path {
    /// A plain attribute path with no filter or value path.
    pub fn new(attribute_path: impl Into<String>) -> Self {
        Self {
            schema_identifier: None,
            attribute_path: attribute_path.into(),
            sub_attributes: Vec::new(),
            value_path: None,
        }
    }

    pub fn parse(input: &str) -> FilterResult<Path> {
        let offset = input.len() - input.trim_start().len();
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(syntax("path is empty", 0));
        }

        let bracket = trimmed.find('[');
        let head = &trimmed[..bracket.unwrap_or(trimmed.len())];

        let (schema_identifier, attribute) = split_schema(head);
        if attribute.is_empty() && schema_identifier.is_some() && bracket.is_none() {
            return Ok(Path {
                schema_identifier,
                ..Path::new("")
            });
        }

        let attribute_offset = offset + head.len() - attribute.len();
        let mut path = dotted(attribute, attribute_offset)?;
        path.schema_identifier = schema_identifier;

        let Some(open) = bracket else {
            return Ok(path);
        };
        if path.value_path.is_some() {
            return Err(syntax(
                "a value filter must follow a top-level attribute",
                offset + open,
            ));
        }

        let close = closing_bracket(trimmed, open).ok_or_else(|| {
            syntax("unterminated '['", offset + open)
        })?;
        let inner_offset = offset + open + 1;
        path.sub_attributes =
            Filter::parse(&trimmed[open + 1..close]).map_err(|error| match error {
                FilterError::InvalidSyntax { message, position } => FilterError::InvalidSyntax {
                    message,
                    position: position + inner_offset,
                },
                other => other,
            })?;

        let rest = &trimmed[close + 1..];
        if !rest.is_empty() {
            let Some(value_path) = rest.strip_prefix('.') else {
                return Err(syntax("expected '.' after ']'", offset + close + 1));
            };
            path.value_path = Some(Box::new(dotted(value_path, offset + close + 2)?));
        }

        Ok(path)
    }

    /// Whether the attribute path names `name`, ignoring case.
    pub fn is(&self, name: &str) -> bool {
        self.attribute_path.eq_ignore_ascii_case(name)
    }

    /// The bracketed filter when it is a single comparison without
    /// alternates or an AND chain.
    pub fn single_sub_filter(&self) -> Option<&Filter> {
        match self.sub_attributes.as_slice() {
            [filter] if filter.additional_filter.is_none() && filter.value_filter.is_none() => {
                Some(filter)
            }
            _ => None,
        }
    }

    pub fn value_path_name(&self) -> Option<&str> {
        self.value_path
            .as_deref()
            .map(|value_path| value_path.attribute_path.as_str())
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(schema) = &self.schema_identifier {
            f.write_str(schema)?;
            if !self.attribute_path.is_empty() {
                f.write_str(":")?;
            }
        }
        f.write_str(&self.attribute_path)?;
        if !self.sub_attributes.is_empty() {
            f.write_str("[")?;
            for (index, alternate) in self.sub_attributes.iter().enumerate() {
                if index > 0 {
                    f.write_str(" or ")?;
                }
                write!(f, "{}", alternate)?;
            }
            f.write_str("]")?;
        }
        if let Some(value_path) = &self.value_path {
            write!(f, ".{}", value_path)?;
        }
        Ok(())
    }
}

fn syntax(message: impl Into<String>, position: usize) -> FilterError {
    FilterError::InvalidSyntax {
        message: message.into(),
        position,
    }
}

/// Split a URN prefix from the attribute. A known schema URN on its own is
/// returned whole with an empty attribute.
fn split_schema(head: &str) -> (Option<String>, &str) {
    let is_urn = head
        .get(..4)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("urn:"));
    if !is_urn {
        return (None, head);
    }
    if catalog::schema(head).is_some() {
        return (Some(head.to_string()), "");
    }
    match head.rfind(':') {
        Some(colon) => (Some(head[..colon].to_string()), &head[colon + 1..]),
        None => (None, head),
    }
}

/// `a.b.c` as nested value paths.
fn dotted(attribute: &str, position: usize) -> FilterResult<Path> {
    let (name, rest) = match attribute.split_once('.') {
        Some((name, rest)) => (name, Some(rest)),
        None => (attribute, None),
    };
    if !is_attribute_name(name) {
        return Err(syntax(
            format!("'{}' is not an attribute name", name),
            position,
        ));
    }

    let mut path = Path::new(name);
    if let Some(rest) = rest {
        path.value_path = Some(Box::new(dotted(rest, position + name.len() + 1)?));
    }
    Ok(path)
}

fn is_attribute_name(name: &str) -> bool {
    let mut characters = name.chars();
    characters
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '$')
        && characters.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '$'))
}

/// Index of the `]` closing the `[` at `open`, skipping quoted text.
fn closing_bracket(input: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut quoted = false;
    let mut escaped = false;
    for (index, character) in input[open..].char_indices() {
        match character {
            _ if escaped => escaped = false,
            '\\' if quoted => escaped = true,
            '"' => quoted = !quoted,
            '[' if !quoted => depth += 1,
            ']' if !quoted => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + index);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::ComparisonOperator;
    use crate::schema::identifiers;

    #[test]
    fn test_plain_attribute() {
        let path = Path::parse("displayName").unwrap();
        assert_eq!(path, Path::new("displayName"));
        assert!(path.is("DISPLAYNAME"));
    }

    #[test]
    fn test_dotted_attribute() {
        let path = Path::parse("name.givenName").unwrap();
        assert_eq!(path.attribute_path, "name");
        assert_eq!(path.value_path_name(), Some("givenName"));
    }

    #[test]
    fn test_value_filter_and_value_path() {
        let path = Path::parse(r#"emails[type eq "work"].value"#).unwrap();
        assert_eq!(path.attribute_path, "emails");
        let filter = path.single_sub_filter().unwrap();
        assert_eq!(filter.attribute_path, "type");
        assert_eq!(filter.operator, ComparisonOperator::Equals);
        assert_eq!(filter.comparison_value.as_deref(), Some("work"));
        assert_eq!(path.value_path_name(), Some("value"));
    }

    #[test]
    fn test_bracket_inside_quotes() {
        let path = Path::parse(r#"members[display eq "a]b"]"#).unwrap();
        assert_eq!(
            path.single_sub_filter().unwrap().comparison_value.as_deref(),
            Some("a]b")
        );
        assert!(path.value_path.is_none());
    }

    #[test]
    fn test_schema_qualified_attribute() {
        let path =
            Path::parse(&format!("{}:department", identifiers::CORE2_ENTERPRISE_USER)).unwrap();
        assert_eq!(
            path.schema_identifier.as_deref(),
            Some(identifiers::CORE2_ENTERPRISE_USER)
        );
        assert_eq!(path.attribute_path, "department");
    }

    #[test]
    fn test_schema_qualified_dotted_attribute() {
        let path =
            Path::parse(&format!("{}:manager.value", identifiers::CORE2_ENTERPRISE_USER))
                .unwrap();
        assert_eq!(path.attribute_path, "manager");
        assert_eq!(path.value_path_name(), Some("value"));
    }

    #[test]
    fn test_whole_schema_path() {
        let path = Path::parse(identifiers::CORE2_ENTERPRISE_USER).unwrap();
        assert_eq!(
            path.schema_identifier.as_deref(),
            Some(identifiers::CORE2_ENTERPRISE_USER)
        );
        assert!(path.attribute_path.is_empty());
    }

    #[test]
    fn test_multiple_alternates_have_no_single_filter() {
        let path = Path::parse(r#"emails[type eq "work" or type eq "home"]"#).unwrap();
        assert_eq!(path.sub_attributes.len(), 2);
        assert!(path.single_sub_filter().is_none());
    }

    #[test]
    fn test_display() {
        let input = r#"emails[type eq "work"].value"#;
        assert_eq!(Path::parse(input).unwrap().to_string(), input);
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            Path::parse("   "),
            Err(FilterError::InvalidSyntax { position: 0, .. })
        ));
        assert!(matches!(
            Path::parse(r#"emails[type eq "work""#),
            Err(FilterError::InvalidSyntax { position: 6, .. })
        ));
        assert!(matches!(
            Path::parse(r#"emails[type eq "work"]value"#),
            Err(FilterError::InvalidSyntax { position: 22, .. })
        ));
        assert!(matches!(
            Path::parse("1abc"),
            Err(FilterError::InvalidSyntax { position: 0, .. })
        ));
        // Position points into the bracket contents.
        assert!(matches!(
            Path::parse("emails[type eq]"),
            Err(FilterError::InvalidSyntax { position: 14, .. })
        ));
    }
}
