//! Bracketed expression forms.

use core::fmt;

use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};

use super::Operand;
use crate::operator::Operator;

/// An element of a bracketed expression.
///
/// Both the precedence-resolved form and the display form are built from
/// nodes. A [`Node::Group`] is one pair of brackets: in the resolved form one
/// operation, in the display form one pair of source parentheses.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// An operand.
    Operand(Operand),
    /// An operator, in source position.
    Operator(Operator),
    /// The `AND` between the bounds of `BETWEEN`.
    Separator,
    /// A list of values, such as the target of `IN`.
    List(Vec<Node>),
    /// A bracketed group.
    Group(Vec<Node>),
}

impl Node {
    /// Returns the nodes of a group or list, or `None` for a leaf.
    #[must_use]
    pub fn children(&self) -> Option<&[Self]> {
        match self {
            Self::Group(nodes) | Self::List(nodes) => Some(nodes),
            _ => None,
        }
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Operand(operand) => operand.serialize(serializer),
            Self::Operator(operator) => operator.serialize(serializer),
            Self::Separator => serializer.serialize_str("AND"),
            Self::List(nodes) | Self::Group(nodes) => {
                let mut seq = serializer.serialize_seq(Some(nodes.len()))?;
                for node in nodes {
                    seq.serialize_element(node)?;
                }
                seq.end()
            }
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Operand(operand) => write!(f, "{operand}"),
            Self::Operator(operator) => write!(f, "{operator}"),
            Self::Separator => f.write_str("AND"),
            Self::List(nodes) => {
                f.write_str("(")?;
                for (i, node) in nodes.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{node}")?;
                }
                f.write_str(")")
            }
            Self::Group(nodes) => {
                f.write_str("(")?;
                for (i, node) in nodes.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{node}")?;
                }
                f.write_str(")")
            }
        }
    }
}
