//! WHERE-clause parser
//!
//! Tokens are classified once, then either grouped by precedence
//! (bracket-and-resolve) or folded through an evaluator (shunting-yard).
//! Both strategies produce the same result.

mod classify;
mod error;
mod grouping;
mod parser;
mod shunting;

pub use error::SyntaxError;
pub use parser::{Parsed, WhereParser};
