//! Operator kinds and arities.

use core::fmt;

use serde::{Deserialize, Serialize, Serializer};

use crate::config::ConfigError;

/// Number of operands an operator takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Arity {
    /// One operand, following the operator.
    Unary = 1,
    /// Two operands, around the operator.
    Binary = 2,
    /// Three operands (`x BETWEEN low AND high`).
    Ternary = 3,
}

impl Arity {
    /// Returns the operand count.
    #[must_use]
    pub const fn count(self) -> usize {
        self as usize
    }
}

impl TryFrom<u8> for Arity {
    type Error = ConfigError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Unary),
            2 => Ok(Self::Binary),
            3 => Ok(Self::Ternary),
            other => Err(ConfigError::InvalidArity(other)),
        }
    }
}

impl From<Arity> for u8 {
    fn from(arity: Arity) -> Self {
        arity as Self
    }
}

/// An operator of the WHERE-clause grammar.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operator {
    // Arithmetic
    /// `*`
    Multiply,
    /// `/`
    Divide,
    /// `%`
    Modulo,
    /// Binary `+`
    Add,
    /// Binary `-`
    Subtract,
    /// Prefix `-`. Binds tighter than every configured tier.
    Negate,

    // Comparison
    /// `=`
    Equal,
    /// `!=`
    NotEqual,
    /// `<`
    Less,
    /// `>`
    Greater,
    /// `<=`
    LessOrEqual,
    /// `>=`
    GreaterOrEqual,

    /// `,`, folding its operands into a list.
    Comma,

    // Keywords
    /// `NOT`
    Not,
    /// `BETWEEN ... AND ...`
    Between,
    /// `IN`
    In,
    /// `IS`
    Is,
    /// `LIKE`
    Like,
    /// `AND`
    And,
    /// `OR`
    Or,

    /// An operator registered through the configuration.
    Custom {
        /// The operator text, upper-cased.
        symbol: String,
        /// Number of operands.
        arity: Arity,
    },
}

/// Default precedence tiers, tightest first.
pub(crate) const DEFAULT_TIERS: &[&[Operator]] = &[
    &[Operator::Multiply, Operator::Divide, Operator::Modulo],
    &[Operator::Add, Operator::Subtract],
    &[
        Operator::Equal,
        Operator::NotEqual,
        Operator::Less,
        Operator::Greater,
        Operator::LessOrEqual,
        Operator::GreaterOrEqual,
    ],
    &[Operator::Comma],
    &[Operator::Not],
    &[Operator::Between, Operator::In, Operator::Is, Operator::Like],
    &[Operator::And],
    &[Operator::Or],
];

impl Operator {
    /// Looks up a built-in operator by its text, ignoring case.
    ///
    /// `-` always resolves to [`Operator::Subtract`]; the parser decides
    /// from context when it is a [`Operator::Negate`].
    #[must_use]
    pub fn builtin(symbol: &str) -> Option<Self> {
        let operator = match symbol.to_ascii_uppercase().as_str() {
            "*" => Self::Multiply,
            "/" => Self::Divide,
            "%" => Self::Modulo,
            "+" => Self::Add,
            "-" => Self::Subtract,
            "=" => Self::Equal,
            "!=" => Self::NotEqual,
            "<" => Self::Less,
            ">" => Self::Greater,
            "<=" => Self::LessOrEqual,
            ">=" => Self::GreaterOrEqual,
            "," => Self::Comma,
            "NOT" => Self::Not,
            "BETWEEN" => Self::Between,
            "IN" => Self::In,
            "IS" => Self::Is,
            "LIKE" => Self::Like,
            "AND" => Self::And,
            "OR" => Self::Or,
            _ => return None,
        };
        Some(operator)
    }

    /// Returns the operator's text. [`Operator::Negate`] is `-`.
    #[must_use]
    pub fn symbol(&self) -> &str {
        match self {
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Modulo => "%",
            Self::Add => "+",
            Self::Subtract | Self::Negate => "-",
            Self::Equal => "=",
            Self::NotEqual => "!=",
            Self::Less => "<",
            Self::Greater => ">",
            Self::LessOrEqual => "<=",
            Self::GreaterOrEqual => ">=",
            Self::Comma => ",",
            Self::Not => "NOT",
            Self::Between => "BETWEEN",
            Self::In => "IN",
            Self::Is => "IS",
            Self::Like => "LIKE",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Custom { symbol, .. } => symbol,
        }
    }

    /// Returns the number of operands.
    #[must_use]
    pub const fn arity(&self) -> Arity {
        match self {
            Self::Negate | Self::Not => Arity::Unary,
            Self::Between => Arity::Ternary,
            Self::Custom { arity, .. } => *arity,
            _ => Arity::Binary,
        }
    }

    /// Returns true for operators written before their only operand.
    #[must_use]
    pub const fn is_prefix(&self) -> bool {
        matches!(self.arity(), Arity::Unary)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl Serialize for Operator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookup_ignores_case() {
        assert_eq!(Operator::builtin("and"), Some(Operator::And));
        assert_eq!(Operator::builtin("Between"), Some(Operator::Between));
        assert_eq!(Operator::builtin(">="), Some(Operator::GreaterOrEqual));
        assert_eq!(Operator::builtin("-"), Some(Operator::Subtract));
        assert_eq!(Operator::builtin("<>"), None);
    }

    #[test]
    fn test_builtin_arities() {
        assert_eq!(Operator::Not.arity(), Arity::Unary);
        assert_eq!(Operator::Negate.arity(), Arity::Unary);
        assert_eq!(Operator::Between.arity(), Arity::Ternary);
        assert_eq!(Operator::In.arity(), Arity::Binary);
        assert!(Operator::Negate.is_prefix());
        assert!(!Operator::Subtract.is_prefix());
    }

    #[test]
    fn test_negate_shares_minus_symbol() {
        assert_eq!(Operator::Negate.symbol(), "-");
        assert_ne!(Operator::Negate, Operator::Subtract);
    }

    #[test]
    fn test_builtin_symbols_round_trip() {
        for operator in DEFAULT_TIERS.iter().flat_map(|tier| tier.iter()) {
            assert_eq!(Operator::builtin(operator.symbol()).as_ref(), Some(operator));
        }
    }

    #[test]
    fn test_arity_conversion() {
        assert_eq!(Arity::try_from(3).unwrap(), Arity::Ternary);
        assert_eq!(u8::from(Arity::Unary), 1);
        assert_eq!(Arity::Binary.count(), 2);
        assert!(matches!(
            Arity::try_from(0),
            Err(ConfigError::InvalidArity(0))
        ));
    }

    #[test]
    fn test_custom_operator() {
        let op = Operator::Custom {
            symbol: "<=>".into(),
            arity: Arity::Binary,
        };
        assert_eq!(op.to_string(), "<=>");
        assert_eq!(serde_json::to_value(&op).unwrap(), serde_json::json!("<=>"));
    }
}
