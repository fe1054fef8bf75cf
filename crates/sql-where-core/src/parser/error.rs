//! Syntax errors.

use thiserror::Error;

use crate::lexer::Span;
use crate::operator::Operator;

/// A WHERE clause that cannot be parsed.
///
/// Parsing stops at the first error; no partial result is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SyntaxError {
    /// An operator is missing one or more of its operands.
    #[error("operator '{operator}' at {span} is missing an operand")]
    MissingOperand { operator: Operator, span: Span },

    /// `BETWEEN` without `AND` after its lower bound.
    #[error("BETWEEN at {span} expects AND between its bounds")]
    MalformedBetween { span: Span },

    /// The right side of `IN` is not a list.
    #[error("IN expects a list, found the expression at {span}")]
    InvalidInTarget { span: Span },

    /// A `(` or `)` without its partner.
    #[error("unmatched parenthesis at {span}")]
    UnmatchedParenthesis { span: Span },

    /// Two operands with no operator between them.
    #[error("expected an operator before {span}")]
    MissingOperator { span: Span },
}

impl SyntaxError {
    /// Returns where the error was detected.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::MissingOperand { span, .. }
            | Self::MalformedBetween { span }
            | Self::InvalidInTarget { span }
            | Self::UnmatchedParenthesis { span }
            | Self::MissingOperator { span } => *span,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_construct() {
        let err = SyntaxError::MissingOperand {
            operator: Operator::GreaterOrEqual,
            span: Span::new(4, 6),
        };
        assert_eq!(err.to_string(), "operator '>=' at 4..6 is missing an operand");
        assert_eq!(err.span(), Span::new(4, 6));

        let err = SyntaxError::UnmatchedParenthesis { span: Span::new(0, 1) };
        assert_eq!(err.to_string(), "unmatched parenthesis at 0..1");
    }
}
