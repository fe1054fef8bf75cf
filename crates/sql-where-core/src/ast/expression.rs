//! Operator/operand trees.

use core::fmt;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::lexer::Literal;
use crate::operator::Operator;

/// A leaf of an expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Operand {
    /// A literal value.
    Literal(Literal),
    /// A bare word that is not an operator, with its original casing.
    Identifier(String),
}

impl Operand {
    /// Returns the operand as JSON. Identifiers become strings.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Literal(literal) => literal.to_json(),
            Self::Identifier(name) => Value::String(name.clone()),
        }
    }
}

/// Quote characters tried in order when rendering a string literal.
const QUOTES: [char; 3] = ['"', '\'', '`'];

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(Literal::String(text)) => {
                match QUOTES.into_iter().find(|quote| !text.contains(*quote)) {
                    Some(quote) => write!(f, "{quote}{text}{quote}"),
                    None => write!(f, "\"{}\"", text.replace('"', "\\\"")),
                }
            }
            Self::Literal(literal) => write!(f, "{literal}"),
            Self::Identifier(name) => f.write_str(name),
        }
    }
}

/// A precedence-resolved expression tree.
///
/// Every [`Expr::Operation`] holds exactly as many operands as its
/// operator's [`Arity`](crate::operator::Arity).
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A single operand.
    Operand(Operand),
    /// A list, such as the target of `IN` or a comma-separated sequence.
    List(Vec<Expr>),
    /// An operator applied to its operands.
    Operation {
        /// The operator.
        operator: Operator,
        /// The operands, in source order.
        operands: Vec<Expr>,
    },
}

impl Expr {
    /// Folds the tree bottom-up, calling `evaluator` for every operation.
    ///
    /// Operands become JSON scalars and lists become arrays; the evaluator
    /// receives an operation's already folded operands.
    pub fn evaluate<F>(&self, evaluator: &mut F) -> Value
    where
        F: FnMut(&Operator, Vec<Value>) -> Value,
    {
        match self {
            Self::Operand(operand) => operand.to_json(),
            Self::List(items) => Value::Array(items.iter().map(|item| item.evaluate(evaluator)).collect()),
            Self::Operation { operator, operands } => {
                let values = operands.iter().map(|operand| operand.evaluate(evaluator)).collect();
                evaluator(operator, values)
            }
        }
    }

    /// Folds the tree with [`default_evaluator`].
    #[must_use]
    pub fn to_json(&self) -> Value {
        self.evaluate(&mut default_evaluator)
    }

    /// Returns the operator of an operation.
    #[must_use]
    pub const fn operator(&self) -> Option<&Operator> {
        match self {
            Self::Operation { operator, .. } => Some(operator),
            _ => None,
        }
    }
}

/// Builds `{ "<symbol>": [operands...] }`.
///
/// The prefix minus is keyed `-` like subtraction, and is told apart by its
/// single operand.
#[must_use]
pub fn default_evaluator(operator: &Operator, operands: Vec<Value>) -> Value {
    let mut object = Map::new();
    object.insert(operator.symbol().to_string(), Value::Array(operands));
    Value::Object(object)
}

impl Serialize for Expr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// Displays operations in parentheses so the rendering parses back to the same tree.
struct Nested<'a>(&'a Expr);

impl fmt::Display for Nested<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Expr::Operation { .. } => write!(f, "({})", self.0),
            other => write!(f, "{other}"),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Operand(operand) => write!(f, "{operand}"),
            Self::List(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", Nested(item))?;
                }
                f.write_str(")")
            }
            Self::Operation { operator, operands } => match operands.as_slice() {
                [value, low, high] => write!(
                    f,
                    "{} {operator} {} AND {}",
                    Nested(value),
                    Nested(low),
                    Nested(high)
                ),
                [operand] => write!(f, "{operator} {}", Nested(operand)),
                [left, right] => write!(f, "{} {operator} {}", Nested(left), Nested(right)),
                _ => {
                    write!(f, "{operator}")?;
                    for operand in operands {
                        write!(f, " {}", Nested(operand))?;
                    }
                    Ok(())
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ident(name: &str) -> Expr {
        Expr::Operand(Operand::Identifier(name.into()))
    }

    fn int(i: i64) -> Expr {
        Expr::Operand(Operand::Literal(Literal::Integer(i)))
    }

    fn op(operator: Operator, operands: Vec<Expr>) -> Expr {
        Expr::Operation { operator, operands }
    }

    #[test]
    fn test_default_evaluator_shape() {
        let tree = op(
            Operator::And,
            vec![
                op(Operator::Equal, vec![ident("a"), int(1)]),
                op(Operator::In, vec![ident("b"), Expr::List(vec![ident("x"), int(2)])]),
            ],
        );
        assert_eq!(
            tree.to_json(),
            json!({ "AND": [{ "=": ["a", 1] }, { "IN": ["b", ["x", 2]] }] })
        );
    }

    #[test]
    fn test_negate_keyed_as_minus() {
        let tree = op(Operator::Negate, vec![int(5)]);
        assert_eq!(tree.to_json(), json!({ "-": [5] }));
    }

    #[test]
    fn test_custom_evaluator_sees_folded_operands() {
        let tree = op(
            Operator::GreaterOrEqual,
            vec![ident("age"), op(Operator::Add, vec![int(20), int(7)])],
        );
        let folded = tree.evaluate(&mut |operator: &Operator, operands: Vec<Value>| {
            if *operator == Operator::Add {
                json!(operands[0].as_i64().unwrap() + operands[1].as_i64().unwrap())
            } else {
                default_evaluator(operator, operands)
            }
        });
        assert_eq!(folded, json!({ ">=": ["age", 27] }));
    }

    #[test]
    fn test_display() {
        let tree = op(
            Operator::Or,
            vec![
                op(
                    Operator::Between,
                    vec![ident("a"), int(1), op(Operator::Negate, vec![int(2)])],
                ),
                op(
                    Operator::Not,
                    vec![op(
                        Operator::Equal,
                        vec![
                            ident("name"),
                            Expr::Operand(Operand::Literal(Literal::String("say \"hi\"".into()))),
                        ],
                    )],
                ),
            ],
        );
        assert_eq!(
            tree.to_string(),
            r#"(a BETWEEN 1 AND (- 2)) OR (NOT (name = 'say "hi"'))"#
        );
        assert_eq!(Expr::List(vec![ident("NY"), int(3)]).to_string(), "(NY, 3)");
    }

    #[test]
    fn test_string_quote_choice() {
        let text = |s: &str| Operand::Literal(Literal::String(s.into())).to_string();
        assert_eq!(text("plain"), r#""plain""#);
        assert_eq!(text(r#"a\"b"#), r#"'a\"b'"#);
        assert_eq!(text(r#"say "it's""#), r#"`say "it's"`"#);
        assert_eq!(text(r#"a"b'c`d"#), r#""a\"b'c`d""#);
    }

    #[test]
    fn test_serialize_matches_to_json() {
        let tree = op(Operator::Equal, vec![ident("a"), int(1)]);
        assert_eq!(serde_json::to_value(&tree).unwrap(), tree.to_json());
    }
}
