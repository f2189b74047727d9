//! Token-sequence field values

use crate::error::{Error, Result};
use ahash::AHashMap;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

lazy_static! {
    static ref NUMERIC: Regex = Regex::new(r"^\s*[+-]?\d+[/.]?\d*\s*$").unwrap();
}

/// An atomic piece of a [`Value`]: literal text or a symbolic macro reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Token {
    /// Literal text
    Literal(String),
    /// Reference to a named macro
    Symbol(String),
}

impl Token {
    /// Create a literal token
    #[must_use]
    pub fn literal(text: impl Into<String>) -> Self {
        Self::Literal(text.into())
    }

    /// Create a symbol token, validating the identifier
    pub fn symbol(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() || !name.chars().all(is_symbol_char) {
            return Err(Error::InvalidSymbol(name));
        }
        Ok(Self::Symbol(name))
    }

    /// The token's text content (symbols yield their bare identifier)
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Literal(s) | Self::Symbol(s) => s,
        }
    }

    /// True for symbol tokens
    #[must_use]
    pub const fn is_symbol(&self) -> bool {
        matches!(self, Self::Symbol(_))
    }
}

/// Characters permitted in a symbol identifier (letters, numbers,
/// underscores, hyphens, colons, dots)
fn is_symbol_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | ':' | '.')
}

/// An ordered sequence of [`Token`]s holding one field's raw,
/// possibly-concatenated content.
///
/// Equality, ordering, and the enumerated string operations all work on the
/// rendered display string, never on the raw token sequence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Value {
    tokens: Vec<Token>,
}

impl Value {
    /// Create an empty value
    #[must_use]
    pub const fn new() -> Self {
        Self { tokens: Vec::new() }
    }

    /// Create a value holding a single symbol token
    pub fn symbol(name: impl Into<String>) -> Result<Self> {
        Ok(Self {
            tokens: vec![Token::symbol(name)?],
        })
    }

    /// Build a value from several parts, flattening nested values
    #[must_use]
    pub fn compound<I>(parts: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Self>,
    {
        let mut value = Self::new();
        for part in parts {
            value.push_value(part.into());
        }
        value
    }

    /// Append literal text as one token
    pub fn push_str(&mut self, text: impl Into<String>) -> &mut Self {
        self.tokens.push(Token::Literal(text.into()));
        self
    }

    /// Append a symbol token
    pub fn push_symbol(&mut self, name: impl Into<String>) -> Result<&mut Self> {
        self.tokens.push(Token::symbol(name)?);
        Ok(self)
    }

    /// Append another value's tokens (flattening)
    pub fn push_value(&mut self, other: Self) -> &mut Self {
        self.tokens.extend(other.tokens);
        self
    }

    /// The underlying token sequence
    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// True if the value involves no concatenation (fewer than two tokens)
    #[must_use]
    pub fn is_atomic(&self) -> bool {
        self.tokens.len() < 2
    }

    /// True if the rendered content is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.render().is_empty()
    }

    /// True if the rendered content is a number: an optional sign, digits,
    /// at most one `/` or `.`, optional trailing digits, with surrounding
    /// whitespace tolerated
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        NUMERIC.is_match(&self.render())
    }

    /// True if any token is a symbol
    #[must_use]
    pub fn has_symbol(&self) -> bool {
        self.tokens.iter().any(Token::is_symbol)
    }

    /// All symbol identifiers, in token order
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.tokens
            .iter()
            .filter(|t| t.is_symbol())
            .map(Token::text)
    }

    /// Merge every run of consecutive literal tokens into a single literal;
    /// symbol tokens break runs. Idempotent.
    pub fn join(&mut self) -> &mut Self {
        let mut folded: Vec<Token> = Vec::with_capacity(self.tokens.len());
        for token in std::mem::take(&mut self.tokens) {
            match token {
                Token::Literal(text) => match folded.last_mut() {
                    Some(Token::Literal(tail)) => tail.push_str(&text),
                    _ => folded.push(Token::Literal(text)),
                },
                symbol => folded.push(symbol),
            }
        }
        self.tokens = folded;
        self
    }

    /// Substitute symbol tokens through a lookup table, splicing in the
    /// mapped value's tokens; unmapped tokens stay as they are. A value
    /// without symbols is left untouched.
    pub fn replace(&mut self, table: &AHashMap<String, Self>) -> &mut Self {
        if !self.has_symbol() {
            return self;
        }
        let mut replaced = Vec::with_capacity(self.tokens.len());
        for token in std::mem::take(&mut self.tokens) {
            match token {
                Token::Symbol(name) => match table.get(&name) {
                    Some(value) => replaced.extend(value.tokens.iter().cloned()),
                    None => replaced.push(Token::Symbol(name)),
                },
                literal => replaced.push(literal),
            }
        }
        self.tokens = replaced;
        self
    }

    /// Replace the whole token sequence with a single literal. A value
    /// without symbols is left untouched.
    pub fn replace_with(&mut self, text: impl Into<String>) -> &mut Self {
        if self.has_symbol() {
            self.tokens = vec![Token::Literal(text.into())];
        }
        self
    }

    /// Render with the whole value wrapped between a quote pair; the pair
    /// wraps the full rendering, never individual tokens
    #[must_use]
    pub fn to_quoted_string(&self, open: &str, close: &str) -> String {
        format!("{open}{}{close}", self.render())
    }

    /// Delegated substring test on the rendering
    #[must_use]
    pub fn contains(&self, pat: &str) -> bool {
        self.render().contains(pat)
    }

    /// Delegated prefix test on the rendering
    #[must_use]
    pub fn starts_with(&self, pat: &str) -> bool {
        self.render().starts_with(pat)
    }

    /// Delegated suffix test on the rendering
    #[must_use]
    pub fn ends_with(&self, pat: &str) -> bool {
        self.render().ends_with(pat)
    }

    /// Lowercased rendering
    #[must_use]
    pub fn to_lowercase(&self) -> String {
        self.render().to_lowercase()
    }

    /// Uppercased rendering
    #[must_use]
    pub fn to_uppercase(&self) -> String {
        self.render().to_uppercase()
    }

    /// Delegated regex test on the rendering
    #[must_use]
    pub fn is_match(&self, re: &Regex) -> bool {
        re.is_match(&self.render())
    }

    /// Leading-integer coercion of the rendering
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        leading_i64(&self.render())
    }

    /// Full-number coercion of the rendering
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        self.render().trim().parse().ok()
    }

    /// Display rendering: atomic values render their bare token text;
    /// compound values render tokens joined by `" # "` with literals quoted
    /// and symbols bare.
    fn render(&self) -> String {
        match self.tokens.as_slice() {
            [] => String::new(),
            [token] => token.text().to_string(),
            tokens => {
                let mut out = String::new();
                for (i, token) in tokens.iter().enumerate() {
                    if i > 0 {
                        out.push_str(" # ");
                    }
                    match token {
                        Token::Literal(s) => {
                            out.push('"');
                            out.push_str(s);
                            out.push('"');
                        }
                        Token::Symbol(s) => out.push_str(s),
                    }
                }
                out
            }
        }
    }
}

/// Parse the leading (optionally signed) integer of a string, after
/// leading whitespace
pub(crate) fn leading_i64(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let digits = &s[..end];
    if !digits.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Self {
            tokens: vec![Token::Literal(text.to_string())],
        }
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Self {
            tokens: vec![Token::Literal(text)],
        }
    }
}

impl From<Token> for Value {
    fn from(token: Token) -> Self {
        Self {
            tokens: vec![token],
        }
    }
}

impl From<i64> for Value {
    fn from(number: i64) -> Self {
        Self {
            tokens: vec![Token::Literal(number.to_string())],
        }
    }
}

impl FromIterator<Token> for Value {
    fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
        Self {
            tokens: iter.into_iter().collect(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.render() == other.render()
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        self.render().cmp(&other.render())
    }
}

impl PartialEq<str> for Value {
    fn eq(&self, other: &str) -> bool {
        self.render() == other
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        self.render() == *other
    }
}
