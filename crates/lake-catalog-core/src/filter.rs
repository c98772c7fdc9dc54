// crates/lake-catalog-core/src/filter.rs
// ============================================================================
// Module: OData Filter Expressions
// Description: Parser, evaluator, and canonical renderer for `$filter` values.
// Purpose: Let list calls send a filter and enforce the same predicate locally.
// Dependencies: serde_json, thiserror
// ============================================================================

//! ## Overview
//! Filters are the boolean subset of OData used by catalog list calls.
//!
//! ### Grammar (informal)
//! - `expr := or`
//! - `or := and ('or' and)*`
//! - `and := unary ('and' unary)*`
//! - `unary := 'not' unary | '(' expr ')' | comparison`
//! - `comparison := field op literal` with `op` one of `eq ne gt ge lt le`
//! - `literal := true | false | null | number | 'string'`
//!
//! Keywords are case-insensitive. A quote inside a string literal is written
//! as two quotes. Field paths may address nested members with `/`.
//!
//! Invariants:
//! - `Filter::parse(&filter.to_string())` yields a filter equal to `filter`.
//! - Field paths are lexable identifiers and never keywords.
//! - `and`/`or` groups always hold at least two members.
//! - A missing field evaluates as `null`.
//! - Ordering comparisons between different JSON types are false.
//!
//! Security posture: filter text is untrusted; input size and nesting depth
//! are bounded.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde_json::Number;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum allowed filter input size in bytes.
pub const MAX_FILTER_INPUT_BYTES: usize = 16 * 1024;
/// Maximum supported nesting depth for parenthesized and negated expressions.
pub const MAX_FILTER_NESTING: usize = 32;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while parsing a filter expression.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - Positions are byte offsets into the original input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// Input was empty or contained only whitespace.
    #[error("filter is empty")]
    EmptyInput,
    /// Input exceeded the size limit.
    #[error("filter exceeds size limit: {actual_bytes} bytes (max {max_bytes})")]
    InputTooLarge {
        /// Maximum allowed bytes.
        max_bytes: usize,
        /// Actual input length in bytes.
        actual_bytes: usize,
    },
    /// Input exceeded the nesting limit.
    #[error("filter nesting exceeds limit {max_depth} at {position}")]
    NestingTooDeep {
        /// Maximum allowed nesting depth.
        max_depth: usize,
        /// Byte offset in the original input.
        position: usize,
    },
    /// Unexpected token encountered during parsing.
    #[error("unexpected token `{found}` at {position}, expected {expected}")]
    UnexpectedToken {
        /// Human-friendly expectation summary.
        expected: &'static str,
        /// The token that was actually seen.
        found: String,
        /// Byte offset in the original input.
        position: usize,
    },
    /// String literal was not closed.
    #[error("unterminated string literal starting at {position}")]
    UnterminatedString {
        /// Byte offset of the opening quote.
        position: usize,
    },
    /// Numeric literal failed to parse.
    #[error("invalid number `{raw}` at {position}")]
    InvalidNumber {
        /// The raw numeric text.
        raw: String,
        /// Byte offset in the original input.
        position: usize,
    },
    /// Unexpected trailing input after a complete expression.
    #[error("unexpected trailing input at {position}")]
    TrailingInput {
        /// Byte offset where unexpected input begins.
        position: usize,
    },
    /// Field path is not an identifier path or collides with a keyword.
    #[error("invalid filter field `{field}`")]
    InvalidField {
        /// The rejected field path.
        field: String,
    },
    /// An `and`/`or` group was built without any members.
    #[error("filter group has no members")]
    EmptyGroup,
}

impl FilterError {
    /// Returns the byte offset associated with the error, when there is one.
    #[must_use]
    pub const fn position(&self) -> Option<usize> {
        match self {
            Self::EmptyInput
            | Self::InputTooLarge { .. }
            | Self::InvalidField { .. }
            | Self::EmptyGroup => None,
            Self::NestingTooDeep {
                position, ..
            }
            | Self::UnexpectedToken {
                position, ..
            }
            | Self::UnterminatedString {
                position,
            }
            | Self::InvalidNumber {
                position, ..
            }
            | Self::TrailingInput {
                position,
            } => Some(*position),
        }
    }
}

// ============================================================================
// SECTION: Expression Tree
// ============================================================================

/// Comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    /// Equal.
    Eq,
    /// Not equal.
    Ne,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Ge,
    /// Less than.
    Lt,
    /// Less than or equal.
    Le,
}

impl CompareOp {
    /// Returns the wire keyword for the operator.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::Gt => "gt",
            Self::Ge => "ge",
            Self::Lt => "lt",
            Self::Le => "le",
        }
    }

    /// Resolves an operator keyword, ignoring ASCII case.
    fn from_keyword(word: &str) -> Option<Self> {
        [Self::Eq, Self::Ne, Self::Gt, Self::Ge, Self::Lt, Self::Le]
            .into_iter()
            .find(|op| op.as_str().eq_ignore_ascii_case(word))
    }
}

/// Literal operand of a comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    /// `null`.
    Null,
    /// `true` or `false`.
    Bool(bool),
    /// Numeric literal.
    Number(Number),
    /// Quoted string literal (unescaped).
    String(String),
}

impl Literal {
    /// Creates a string literal.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::String(value.into())
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for Literal {
    fn from(value: i32) -> Self {
        Self::Number(Number::from(value))
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Self::Number(Number::from(value))
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Number(value) => write!(f, "{value}"),
            Self::String(value) => write!(f, "'{}'", value.replace('\'', "''")),
        }
    }
}

/// Single `field op literal` comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    /// Field path; `/` separates nested members.
    pub field: String,
    /// Comparison operator.
    pub op: CompareOp,
    /// Literal operand.
    pub value: Literal,
}

/// Parsed filter expression.
///
/// # Invariants
/// - Every field path is renderable and re-parses to itself.
/// - `and`/`or` groups hold at least two members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    /// Top-level node.
    node: Node,
}

/// Internal expression node.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    /// Leaf comparison.
    Compare(Comparison),
    /// Conjunction of two or more members.
    And(Vec<Filter>),
    /// Disjunction of two or more members.
    Or(Vec<Filter>),
    /// Negation.
    Not(Box<Filter>),
}

/// Borrowed view of a filter's top-level shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterNode<'a> {
    /// Leaf comparison.
    Compare(&'a Comparison),
    /// Conjunction.
    And(&'a [Filter]),
    /// Disjunction.
    Or(&'a [Filter]),
    /// Negation.
    Not(&'a Filter),
}

impl Filter {
    /// Builds a comparison leaf.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidField`] when `field` is not an
    /// identifier path or is a keyword.
    pub fn compare(
        field: impl Into<String>,
        op: CompareOp,
        value: impl Into<Literal>,
    ) -> Result<Self, FilterError> {
        let field = field.into();
        if !is_field_path(&field) {
            return Err(FilterError::InvalidField {
                field,
            });
        }
        Ok(Self::from_node(Node::Compare(Comparison {
            field,
            op,
            value: value.into(),
        })))
    }

    /// Builds a `field eq value` leaf.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidField`] for invalid field paths.
    pub fn equals(
        field: impl Into<String>,
        value: impl Into<Literal>,
    ) -> Result<Self, FilterError> {
        Self::compare(field, CompareOp::Eq, value)
    }

    /// Builds a `field ne value` leaf.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidField`] for invalid field paths.
    pub fn not_equals(
        field: impl Into<String>,
        value: impl Into<Literal>,
    ) -> Result<Self, FilterError> {
        Self::compare(field, CompareOp::Ne, value)
    }

    /// Conjunction of `parts`; a single part is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::EmptyGroup`] when `parts` is empty.
    pub fn all(parts: Vec<Self>) -> Result<Self, FilterError> {
        Self::group(parts, Node::And)
    }

    /// Disjunction of `parts`; a single part is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::EmptyGroup`] when `parts` is empty.
    pub fn any(parts: Vec<Self>) -> Result<Self, FilterError> {
        Self::group(parts, Node::Or)
    }

    /// Negates a filter.
    #[must_use]
    pub fn negate(inner: Self) -> Self {
        Self::from_node(Node::Not(Box::new(inner)))
    }

    /// Returns the top-level shape of the filter.
    #[must_use]
    pub fn node(&self) -> FilterNode<'_> {
        match &self.node {
            Node::Compare(comparison) => FilterNode::Compare(comparison),
            Node::And(parts) => FilterNode::And(parts),
            Node::Or(parts) => FilterNode::Or(parts),
            Node::Not(inner) => FilterNode::Not(inner),
        }
    }

    /// Wraps a node.
    const fn from_node(node: Node) -> Self {
        Self {
            node,
        }
    }

    /// Builds a group, collapsing a single member to itself.
    fn group(mut parts: Vec<Self>, make: fn(Vec<Self>) -> Node) -> Result<Self, FilterError> {
        match parts.len() {
            0 => Err(FilterError::EmptyGroup),
            1 => Ok(parts.remove(0)),
            _ => Ok(Self::from_node(make(parts))),
        }
    }

    /// Parses filter text.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError`] for syntax errors, oversize input, or excessive
    /// nesting.
    pub fn parse(input: &str) -> Result<Self, FilterError> {
        if input.len() > MAX_FILTER_INPUT_BYTES {
            return Err(FilterError::InputTooLarge {
                max_bytes: MAX_FILTER_INPUT_BYTES,
                actual_bytes: input.len(),
            });
        }
        let tokens = Lexer::new(input).lex()?;
        let mut parser = Parser::new(tokens);
        let filter = parser.parse_expression()?;
        parser.expect_eof()?;
        Ok(filter)
    }

    /// Evaluates the filter against the JSON form of an object.
    #[must_use]
    pub fn matches(&self, item: &Value) -> bool {
        match &self.node {
            Node::Compare(comparison) => comparison.matches(item),
            Node::And(parts) => parts.iter().all(|part| part.matches(item)),
            Node::Or(parts) => parts.iter().any(|part| part.matches(item)),
            Node::Not(inner) => !inner.matches(item),
        }
    }

    /// Writes a child of a boolean list, parenthesizing nested lists.
    fn fmt_child(child: &Self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match child.node {
            Node::And(_) | Node::Or(_) => write!(f, "({child})"),
            Node::Compare(_) | Node::Not(_) => write!(f, "{child}"),
        }
    }

    /// Writes a joined boolean list.
    fn fmt_list(parts: &[Self], keyword: &str, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, part) in parts.iter().enumerate() {
            if index > 0 {
                write!(f, " {keyword} ")?;
            }
            Self::fmt_child(part, f)?;
        }
        Ok(())
    }
}

impl Comparison {
    /// Evaluates the comparison against an object's JSON form.
    fn matches(&self, item: &Value) -> bool {
        let actual = lookup(item, &self.field).unwrap_or(&Value::Null);
        match self.op {
            CompareOp::Eq => literal_equals(actual, &self.value),
            CompareOp::Ne => !literal_equals(actual, &self.value),
            CompareOp::Gt => literal_ordering(actual, &self.value) == Some(Ordering::Greater),
            CompareOp::Ge => matches!(
                literal_ordering(actual, &self.value),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            CompareOp::Lt => literal_ordering(actual, &self.value) == Some(Ordering::Less),
            CompareOp::Le => matches!(
                literal_ordering(actual, &self.value),
                Some(Ordering::Less | Ordering::Equal)
            ),
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.field, self.op.as_str(), self.value)
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.node {
            Node::Compare(comparison) => comparison.fmt(f),
            Node::And(parts) => Self::fmt_list(parts, "and", f),
            Node::Or(parts) => Self::fmt_list(parts, "or", f),
            Node::Not(inner) => write!(f, "not ({inner})"),
        }
    }
}

impl FromStr for Filter {
    type Err = FilterError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Self::parse(input)
    }
}

// ============================================================================
// SECTION: Evaluation Helpers
// ============================================================================

/// Returns true when `field` lexes back to a single field token.
fn is_field_path(field: &str) -> bool {
    let mut bytes = field.bytes();
    let starts_ok = bytes.next().is_some_and(|b| b.is_ascii_alphabetic() || b == b'_');
    starts_ok
        && bytes.all(is_field_byte)
        && matches!(Lexer::keyword_or_ident(field), Token::Ident(_))
}

/// Returns true for bytes allowed after the first byte of a field path.
const fn is_field_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'/'
}

/// Resolves a `/`-separated field path within a JSON object.
fn lookup<'a>(item: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('/').try_fold(item, |current, segment| current.as_object()?.get(segment))
}

/// Equality between a JSON value and a literal.
fn literal_equals(actual: &Value, literal: &Literal) -> bool {
    match (actual, literal) {
        (Value::Null, Literal::Null) => true,
        (Value::Bool(left), Literal::Bool(right)) => left == right,
        (Value::Number(left), Literal::Number(right)) => {
            compare_numbers(left, right) == Some(Ordering::Equal)
        }
        (Value::String(left), Literal::String(right)) => left == right,
        _ => false,
    }
}

/// Ordering between a JSON value and a literal of the same type.
fn literal_ordering(actual: &Value, literal: &Literal) -> Option<Ordering> {
    match (actual, literal) {
        (Value::Number(left), Literal::Number(right)) => compare_numbers(left, right),
        (Value::String(left), Literal::String(right)) => Some(left.as_str().cmp(right.as_str())),
        _ => None,
    }
}

/// Compares two JSON numbers, exactly when both are integers.
fn compare_numbers(left: &Number, right: &Number) -> Option<Ordering> {
    if let (Some(a), Some(b)) = (left.as_i64(), right.as_i64()) {
        return Some(a.cmp(&b));
    }
    if let (Some(a), Some(b)) = (left.as_u64(), right.as_u64()) {
        return Some(a.cmp(&b));
    }
    left.as_f64()?.partial_cmp(&right.as_f64()?)
}

// ============================================================================
// SECTION: Lexer
// ============================================================================

/// Lexer token produced from filter input.
#[derive(Debug, Clone, PartialEq)]
enum Token<'a> {
    /// Field path.
    Ident(&'a str),
    /// Raw numeric literal.
    Number(&'a str),
    /// Unescaped string literal.
    Str(String),
    /// `true` or `false`.
    Bool(bool),
    /// `null`.
    Null,
    /// Comparison operator keyword.
    Op(CompareOp),
    /// `and`.
    And,
    /// `or`.
    Or,
    /// `not`.
    Not,
    /// Left parenthesis.
    LParen,
    /// Right parenthesis.
    RParen,
    /// End-of-input marker.
    Eof,
}

/// Token paired with its byte offset.
#[derive(Debug, Clone)]
struct SpannedToken<'a> {
    /// Token value.
    token: Token<'a>,
    /// Byte offset into the input.
    position: usize,
}

/// Lexer for filter expressions.
struct Lexer<'a> {
    /// Source input being tokenized.
    input: &'a str,
    /// Current byte offset into the input.
    offset: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    const fn new(input: &'a str) -> Self {
        Self {
            input,
            offset: 0,
        }
    }

    /// Lexes the input into a sequence of tokens.
    fn lex(mut self) -> Result<Vec<SpannedToken<'a>>, FilterError> {
        let mut tokens = Vec::new();
        let bytes = self.input.as_bytes();

        while let Some(&ch) = bytes.get(self.offset) {
            let start = self.offset;
            let token = match ch {
                b' ' | b'\t' | b'\n' | b'\r' => {
                    self.offset += 1;
                    continue;
                }
                b'(' => {
                    self.offset += 1;
                    Token::LParen
                }
                b')' => {
                    self.offset += 1;
                    Token::RParen
                }
                b'\'' => Token::Str(self.lex_string()?),
                b'-' | b'0' ..= b'9' => {
                    self.offset += 1;
                    self.consume_while(bytes, |b| {
                        b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-')
                    });
                    Token::Number(&self.input[start .. self.offset])
                }
                b'a' ..= b'z' | b'A' ..= b'Z' | b'_' => {
                    self.consume_while(bytes, is_field_byte);
                    Self::keyword_or_ident(&self.input[start .. self.offset])
                }
                _ => {
                    let found =
                        self.input[start ..].chars().next().map(String::from).unwrap_or_default();
                    return Err(FilterError::UnexpectedToken {
                        expected: "field, literal, operator, or parenthesis",
                        found,
                        position: start,
                    });
                }
            };
            tokens.push(SpannedToken {
                token,
                position: start,
            });
        }

        if tokens.is_empty() {
            return Err(FilterError::EmptyInput);
        }
        tokens.push(SpannedToken {
            token: Token::Eof,
            position: self.offset,
        });
        Ok(tokens)
    }

    /// Lexes a quoted string literal, collapsing doubled quotes.
    fn lex_string(&mut self) -> Result<String, FilterError> {
        let start = self.offset;
        self.offset += 1;
        let mut value = String::new();
        loop {
            let rest = &self.input[self.offset ..];
            let Some(quote) = rest.find('\'') else {
                return Err(FilterError::UnterminatedString {
                    position: start,
                });
            };
            value.push_str(&rest[.. quote]);
            self.offset += quote + 1;
            if self.input.as_bytes().get(self.offset) == Some(&b'\'') {
                value.push('\'');
                self.offset += 1;
            } else {
                return Ok(value);
            }
        }
    }

    /// Advances while the condition matches the current byte.
    fn consume_while<F>(&mut self, bytes: &[u8], condition: F)
    where
        F: Fn(u8) -> bool,
    {
        while let Some(&b) = bytes.get(self.offset) {
            if condition(b) {
                self.offset += 1;
            } else {
                break;
            }
        }
    }

    /// Maps a word to a keyword token or a field token.
    fn keyword_or_ident(word: &'a str) -> Token<'a> {
        if let Some(op) = CompareOp::from_keyword(word) {
            return Token::Op(op);
        }
        match word.to_ascii_lowercase().as_str() {
            "and" => Token::And,
            "or" => Token::Or,
            "not" => Token::Not,
            "true" => Token::Bool(true),
            "false" => Token::Bool(false),
            "null" => Token::Null,
            _ => Token::Ident(word),
        }
    }
}

// ============================================================================
// SECTION: Parser
// ============================================================================

/// Recursive-descent parser for filter expressions.
struct Parser<'a> {
    /// Token stream with source positions.
    tokens: Vec<SpannedToken<'a>>,
    /// Current token index.
    index: usize,
    /// Current nesting depth.
    nesting: usize,
}

impl<'a> Parser<'a> {
    /// Creates a parser over the token stream.
    const fn new(tokens: Vec<SpannedToken<'a>>) -> Self {
        Self {
            tokens,
            index: 0,
            nesting: 0,
        }
    }

    /// Parses a full expression.
    fn parse_expression(&mut self) -> Result<Filter, FilterError> {
        self.parse_or()
    }

    /// Parses OR expressions.
    fn parse_or(&mut self) -> Result<Filter, FilterError> {
        let mut parts = vec![self.parse_and()?];
        while self.matches(&Token::Or) {
            parts.push(self.parse_and()?);
        }
        Filter::any(parts)
    }

    /// Parses AND expressions.
    fn parse_and(&mut self) -> Result<Filter, FilterError> {
        let mut parts = vec![self.parse_unary()?];
        while self.matches(&Token::And) {
            parts.push(self.parse_unary()?);
        }
        Filter::all(parts)
    }

    /// Parses unary expressions, including NOT and parentheses.
    fn parse_unary(&mut self) -> Result<Filter, FilterError> {
        let position = self.position();
        if self.matches(&Token::Not) {
            return self
                .with_nesting(position, |parser| Ok(Filter::negate(parser.parse_unary()?)));
        }
        if self.matches(&Token::LParen) {
            return self.with_nesting(position, |parser| {
                let expr = parser.parse_expression()?;
                parser.expect(&Token::RParen, "`)`")?;
                Ok(expr)
            });
        }
        self.parse_comparison()
    }

    /// Parses a `field op literal` comparison.
    fn parse_comparison(&mut self) -> Result<Filter, FilterError> {
        let Token::Ident(field) = self.current().token else {
            return Err(self.unexpected("field name, `not`, or `(`"));
        };
        self.advance();
        let Token::Op(op) = self.current().token else {
            return Err(self.unexpected("comparison operator"));
        };
        self.advance();
        let value = self.parse_literal()?;
        Ok(Filter::from_node(Node::Compare(Comparison {
            field: field.to_string(),
            op,
            value,
        })))
    }

    /// Parses a literal operand.
    fn parse_literal(&mut self) -> Result<Literal, FilterError> {
        let position = self.position();
        let literal = match &self.current().token {
            Token::Null => Literal::Null,
            Token::Bool(value) => Literal::Bool(*value),
            Token::Str(value) => Literal::String(value.clone()),
            Token::Number(raw) => {
                let number = raw.parse::<Number>().map_err(|_| FilterError::InvalidNumber {
                    raw: (*raw).to_string(),
                    position,
                })?;
                Literal::Number(number)
            }
            _ => return Err(self.unexpected("literal")),
        };
        self.advance();
        Ok(literal)
    }

    /// Runs a parser step while enforcing the nesting limit.
    fn with_nesting<T>(
        &mut self,
        position: usize,
        f: impl FnOnce(&mut Self) -> Result<T, FilterError>,
    ) -> Result<T, FilterError> {
        let next_depth = self.nesting + 1;
        if next_depth > MAX_FILTER_NESTING {
            return Err(FilterError::NestingTooDeep {
                max_depth: MAX_FILTER_NESTING,
                position,
            });
        }
        self.nesting = next_depth;
        let result = f(self);
        self.nesting = self.nesting.saturating_sub(1);
        result
    }

    /// Consumes the expected token or returns an error.
    fn expect(&mut self, token: &Token<'_>, expected: &'static str) -> Result<(), FilterError> {
        if self.matches(token) { Ok(()) } else { Err(self.unexpected(expected)) }
    }

    /// Ensures the parser is at end-of-input.
    fn expect_eof(&self) -> Result<(), FilterError> {
        if matches!(self.current().token, Token::Eof) {
            Ok(())
        } else {
            Err(FilterError::TrailingInput {
                position: self.position(),
            })
        }
    }

    /// Consumes the token if it matches the expected kind.
    fn matches(&mut self, kind: &Token<'_>) -> bool {
        if std::mem::discriminant(&self.current().token) == std::mem::discriminant(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Returns the current token.
    fn current(&self) -> &SpannedToken<'a> {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[self.index.min(last)]
    }

    /// Returns the byte offset of the current token.
    fn position(&self) -> usize {
        self.current().position
    }

    /// Advances to the next token.
    const fn advance(&mut self) {
        if self.index + 1 < self.tokens.len() {
            self.index += 1;
        }
    }

    /// Builds an unexpected-token error at the current position.
    fn unexpected(&self, expected: &'static str) -> FilterError {
        FilterError::UnexpectedToken {
            expected,
            found: self.describe_current(),
            position: self.position(),
        }
    }

    /// Formats the current token for diagnostics.
    fn describe_current(&self) -> String {
        match &self.current().token {
            Token::Ident(name) => (*name).to_string(),
            Token::Number(raw) => (*raw).to_string(),
            Token::Str(value) => Literal::String(value.clone()).to_string(),
            Token::Bool(value) => value.to_string(),
            Token::Null => "null".to_string(),
            Token::Op(op) => op.as_str().to_string(),
            Token::And => "and".to_string(),
            Token::Or => "or".to_string(),
            Token::Not => "not".to_string(),
            Token::LParen => "(".to_string(),
            Token::RParen => ")".to_string(),
            Token::Eof => "end of input".to_string(),
        }
    }
}
