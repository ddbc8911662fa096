//! Recursive-descent filter parser producing OR-of-AND form.

use crate::filter::lexer::{Token, TokenKind, tokenize};
use crate::filter::{ComparisonOperator, Filter, FilterError, FilterResult};

/// Comparisons joined by AND, each without its own chain.
type Conjunction = Vec<Filter>;
/// Conjunctions joined by OR.
type Disjunction = Vec<Conjunction>;

/// Deepest nesting of `(` and `[` accepted in one expression.
pub(super) const MAX_NESTING_DEPTH: usize = 32;
/// Most alternates an expression may expand to once ANDs are distributed.
pub(super) const MAX_ALTERNATES: usize = 256;

pub(super) fn parse_filter(expression: &str) -> FilterResult<Vec<Filter>> {
    let tokens = tokenize(expression)?;
    if tokens.is_empty() {
        return Err(syntax("filter expression is empty", 0));
    }

    let mut parser = Parser {
        tokens,
        index: 0,
        end: expression.len(),
        depth: 0,
    };
    let disjunction = parser.expression()?;
    if let Some(token) = parser.peek() {
        return Err(syntax("unexpected token", token.position));
    }

    Ok(disjunction.into_iter().filter_map(Filter::from_chain).collect())
}

fn syntax(message: impl Into<String>, position: usize) -> FilterError {
    FilterError::InvalidSyntax {
        message: message.into(),
        position,
    }
}

struct Parser {
    tokens: Vec<Token>,
    index: usize,
    end: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    fn next_token(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.index).cloned();
        if token.is_some() {
            self.index += 1;
        }
        token
    }

    fn next_is_keyword(&self, keyword: &str) -> bool {
        self.peek().is_some_and(|token| token.is_keyword(keyword))
    }

    fn expect(&mut self, kind: TokenKind, description: &str) -> FilterResult<()> {
        match self.next_token() {
            Some(token) if token.kind == kind => Ok(()),
            Some(token) => Err(syntax(format!("expected '{}'", description), token.position)),
            None => Err(syntax(format!("expected '{}'", description), self.end)),
        }
    }

    /// Parse a nested expression, refusing to descend past the depth limit.
    fn nested(&mut self, position: usize) -> FilterResult<Disjunction> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(syntax(
                format!("nesting deeper than {} levels", MAX_NESTING_DEPTH),
                position,
            ));
        }
        self.depth += 1;
        let inner = self.expression();
        self.depth -= 1;
        inner
    }

    fn expression(&mut self) -> FilterResult<Disjunction> {
        let mut alternates = self.term()?;
        while self.next_is_keyword("or") {
            self.index += 1;
            alternates.extend(self.term()?);
            if alternates.len() > MAX_ALTERNATES {
                return Err(FilterError::TooManyAlternates {
                    limit: MAX_ALTERNATES,
                });
            }
        }
        Ok(alternates)
    }

    fn term(&mut self) -> FilterResult<Disjunction> {
        let mut alternates = self.factor()?;
        while self.next_is_keyword("and") {
            self.index += 1;
            let right = self.factor()?;
            alternates = distribute(&alternates, &right)?;
        }
        Ok(alternates)
    }

    fn factor(&mut self) -> FilterResult<Disjunction> {
        let Some(token) = self.next_token() else {
            return Err(syntax("expected an attribute path or '('", self.end));
        };

        match token.kind {
            TokenKind::OpenParen => {
                let inner = self.nested(token.position)?;
                self.expect(TokenKind::CloseParen, ")")?;
                Ok(inner)
            }
            TokenKind::Word(word)
                if word.eq_ignore_ascii_case("not")
                    && self
                        .peek()
                        .is_some_and(|next| next.kind == TokenKind::OpenParen) =>
            {
                Err(FilterError::UnsupportedOperator {
                    operator: word,
                    attribute: "(...)".to_string(),
                })
            }
            TokenKind::Word(word) => self.comparison(word, token.position),
            _ => Err(syntax("expected an attribute path or '('", token.position)),
        }
    }

    fn comparison(&mut self, attribute: String, position: usize) -> FilterResult<Disjunction> {
        if !attribute
            .chars()
            .next()
            .is_some_and(|first| first.is_ascii_alphabetic())
        {
            return Err(syntax(
                format!("'{}' is not an attribute path", attribute),
                position,
            ));
        }

        if self
            .peek()
            .is_some_and(|token| token.kind == TokenKind::OpenBracket)
        {
            return self.value_filter(attribute);
        }

        let operator = match self.next_token() {
            Some(Token {
                kind: TokenKind::Word(keyword),
                ..
            }) => keyword
                .parse::<ComparisonOperator>()
                .map_err(|_| FilterError::UnsupportedOperator {
                    operator: keyword.clone(),
                    attribute: attribute.clone(),
                })?,
            Some(token) => return Err(syntax("expected a comparison operator", token.position)),
            None => return Err(syntax("expected a comparison operator", self.end)),
        };

        let comparison_value = if operator.takes_value() {
            self.comparison_value(&attribute)?
        } else {
            None
        };

        Ok(vec![vec![Filter::new(attribute, operator, comparison_value)]])
    }

    /// `attribute[...]`: each alternate inside the brackets becomes its own
    /// alternate of the enclosing expression.
    fn value_filter(&mut self, attribute: String) -> FilterResult<Disjunction> {
        let position = self.peek().map_or(self.end, |token| token.position);
        self.expect(TokenKind::OpenBracket, "[")?;
        let inner = self.nested(position)?;
        self.expect(TokenKind::CloseBracket, "]")?;

        if let Some(token) = self.peek() {
            if token.word().is_some_and(|word| word.starts_with('.')) {
                return Err(syntax(
                    "a value path after ']' is only valid in patch paths",
                    token.position,
                ));
            }
        }

        Ok(inner
            .into_iter()
            .filter_map(Filter::from_chain)
            .map(|chain| {
                vec![Filter {
                    value_filter: Some(Box::new(chain)),
                    ..Filter::new(attribute.clone(), ComparisonOperator::Present, None)
                }]
            })
            .collect())
    }

    fn comparison_value(&mut self, attribute: &str) -> FilterResult<Option<String>> {
        match self.next_token() {
            Some(Token {
                kind: TokenKind::Text(text),
                ..
            }) => Ok(Some(text)),
            Some(Token {
                kind: TokenKind::Word(literal),
                ..
            }) => bare_literal(attribute, &literal),
            Some(token) => Err(syntax("expected a comparison value", token.position)),
            None => Err(syntax("expected a comparison value", self.end)),
        }
    }
}

fn bare_literal(attribute: &str, literal: &str) -> FilterResult<Option<String>> {
    if literal.eq_ignore_ascii_case("null") {
        return Ok(None);
    }
    if literal.eq_ignore_ascii_case("true") || literal.eq_ignore_ascii_case("false") {
        return Ok(Some(literal.to_ascii_lowercase()));
    }
    if literal.parse::<f64>().is_ok_and(f64::is_finite) {
        return Ok(Some(literal.to_string()));
    }
    Err(FilterError::InvalidComparisonValue {
        attribute: attribute.to_string(),
        message: format!(
            "'{}' is not a quoted string, boolean, number or null",
            literal
        ),
    })
}

fn distribute(left: &Disjunction, right: &Disjunction) -> FilterResult<Disjunction> {
    let size = left.len().saturating_mul(right.len());
    if size > MAX_ALTERNATES {
        return Err(FilterError::TooManyAlternates {
            limit: MAX_ALTERNATES,
        });
    }

    let mut product = Vec::with_capacity(left.len() * right.len());
    for left_chain in left {
        for right_chain in right {
            let mut combined = left_chain.clone();
            combined.extend(right_chain.iter().cloned());
            product.push(combined);
        }
    }
    Ok(product)
}
