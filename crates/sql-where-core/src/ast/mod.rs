//! Parse results.
//!
//! [`Node`] is the bracketed form, grouped either by precedence or by the
//! source's own parentheses. [`Expr`] is the operator/operand tree.

mod expression;
mod node;

pub use expression::{Expr, Operand, default_evaluator};
pub use node::Node;
