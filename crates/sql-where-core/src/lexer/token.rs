//! Token types produced by the tokenizer.

use core::fmt;

use serde::Serialize;
use serde_json::{Number, Value};

use super::Span;

/// A scalar value decoded from the input.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Literal {
    /// `null` (any casing) outside quotes.
    Null,
    /// `true` or `false` (any casing) outside quotes.
    Boolean(bool),
    /// A bare word that parses as a 64-bit integer.
    Integer(i64),
    /// A bare word that parses as a finite float.
    Float(f64),
    /// Quoted text, taken verbatim.
    String(String),
}

impl Literal {
    /// Coerces an unquoted word into a literal.
    ///
    /// Returns `None` when the word is an identifier.
    #[must_use]
    pub fn from_word(word: &str) -> Option<Self> {
        if word.eq_ignore_ascii_case("null") {
            return Some(Self::Null);
        }
        if word.eq_ignore_ascii_case("true") {
            return Some(Self::Boolean(true));
        }
        if word.eq_ignore_ascii_case("false") {
            return Some(Self::Boolean(false));
        }
        if let Ok(integer) = word.parse::<i64>() {
            return Some(Self::Integer(integer));
        }
        // `f64::from_str` also accepts "inf" and "NaN"; those stay words.
        word.parse::<f64>()
            .ok()
            .filter(|float| float.is_finite())
            .map(Self::Float)
    }

    /// Returns the value as JSON.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Boolean(b) => Value::Bool(*b),
            Self::Integer(i) => Value::Number((*i).into()),
            Self::Float(f) => Number::from_f64(*f).map_or(Value::Null, Value::Number),
            Self::String(s) => Value::String(s.clone()),
        }
    }

    /// Returns the value negated, if it is numeric.
    #[must_use]
    pub fn negated(&self) -> Option<Self> {
        match self {
            Self::Integer(i) => i.checked_neg().map(Self::Integer),
            Self::Float(f) => Some(Self::Float(-f)),
            _ => None,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            // Debug keeps the fractional part, so 3.0 does not re-read as an integer.
            Self::Float(x) => write!(f, "{x:?}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

/// The kind of a token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// `(`, `)` or `,`.
    Punctuation(char),
    /// Any other configured stand-alone symbol, such as `<=` or `+`.
    Operator(String),
    /// A decoded literal.
    Literal {
        /// The decoded value.
        value: Literal,
        /// The quote character that delimited it, if any.
        quote: Option<char>,
    },
    /// An unquoted word that is not a literal, with its original casing.
    Identifier(String),
}

/// A token with its location in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The token kind.
    pub kind: TokenKind,
    /// Where the token was found.
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns true if the token was delimited by quotes.
    #[must_use]
    pub const fn is_quoted(&self) -> bool {
        matches!(self.kind, TokenKind::Literal { quote: Some(_), .. })
    }

    /// Returns the text the parser may match against the operator table.
    ///
    /// Literals never name an operator, so they return `None`.
    #[must_use]
    pub fn word(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Punctuation(c) => Some(match c {
                '(' => "(",
                ')' => ")",
                _ => ",",
            }),
            TokenKind::Operator(text) | TokenKind::Identifier(text) => Some(text),
            TokenKind::Literal { .. } => None,
        }
    }

    /// Returns true for `(`.
    #[must_use]
    pub const fn is_open_paren(&self) -> bool {
        matches!(self.kind, TokenKind::Punctuation('('))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TokenKind::Punctuation(c) => write!(f, "{c}"),
            TokenKind::Operator(text) | TokenKind::Identifier(text) => f.write_str(text),
            TokenKind::Literal {
                value,
                quote: Some(q),
            } => write!(f, "{q}{value}{q}"),
            TokenKind::Literal { value, quote: None } => write!(f, "{value}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_coercion() {
        assert_eq!(Literal::from_word("NULL"), Some(Literal::Null));
        assert_eq!(Literal::from_word("True"), Some(Literal::Boolean(true)));
        assert_eq!(Literal::from_word("false"), Some(Literal::Boolean(false)));
        assert_eq!(Literal::from_word("27"), Some(Literal::Integer(27)));
        assert_eq!(Literal::from_word("2.5"), Some(Literal::Float(2.5)));
        assert_eq!(Literal::from_word("1e3"), Some(Literal::Float(1000.0)));
    }

    #[test]
    fn test_words_that_stay_identifiers() {
        assert_eq!(Literal::from_word("shaun"), None);
        assert_eq!(Literal::from_word("inf"), None);
        assert_eq!(Literal::from_word("NaN"), None);
        assert_eq!(Literal::from_word("1e400"), None);
        assert_eq!(Literal::from_word("nullable"), None);
    }

    #[test]
    fn test_literal_to_json() {
        assert_eq!(Literal::Integer(27).to_json(), serde_json::json!(27));
        assert_eq!(Literal::Float(0.5).to_json(), serde_json::json!(0.5));
        assert_eq!(Literal::Null.to_json(), Value::Null);
        assert_eq!(
            Literal::String("Shaun Persad".into()).to_json(),
            serde_json::json!("Shaun Persad")
        );
    }

    #[test]
    fn test_float_display_keeps_fraction() {
        assert_eq!(Literal::Float(3.0).to_string(), "3.0");
        assert_eq!(Literal::Float(2.5).to_string(), "2.5");
    }

    #[test]
    fn test_token_word() {
        let ident = Token::new(TokenKind::Identifier("and".into()), Span::new(0, 3));
        assert_eq!(ident.word(), Some("and"));
        let quoted = Token::new(
            TokenKind::Literal {
                value: Literal::String("AND".into()),
                quote: Some('"'),
            },
            Span::new(0, 5),
        );
        assert_eq!(quoted.word(), None);
        assert!(quoted.is_quoted());
    }
}
