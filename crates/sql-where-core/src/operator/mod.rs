//! Operators and their precedence.

mod kind;
mod table;

pub(crate) use kind::DEFAULT_TIERS;
pub use kind::{Arity, Operator};
pub use table::OperatorTable;
