//! # sql-where-core
//!
//! A parser for the WHERE portion of SQL-like queries.
//!
//! This crate provides:
//! - A configurable character-level tokenizer that can also be fed
//!   incrementally
//! - A precedence parser producing a bracketed form, a display form that
//!   keeps the input's own parentheses, and an operator/operand tree
//! - An evaluator hook that folds the input straight into any JSON shape
//!
//! ## Parsing
//!
//! ```rust
//! use sql_where_core::WhereParser;
//! use serde_json::json;
//!
//! let parser = WhereParser::new();
//! let parsed = parser.parse("a = b OR c AND d").unwrap();
//!
//! assert_eq!(
//!     parsed.expression_tree.to_json(),
//!     json!({ "OR": [{ "=": ["a", "b"] }, { "AND": ["c", "d"] }] })
//! );
//! ```
//!
//! ## Evaluating
//!
//! The evaluator is called for every operation, innermost first, so the
//! input can be converted while it is parsed:
//!
//! ```rust
//! use sql_where_core::{Operator, WhereParser, default_evaluator};
//! use serde_json::json;
//!
//! let parser = WhereParser::new();
//! let filter = parser
//!     .parse_with("age >= (20 + 7)", |operator, operands| match operator {
//!         Operator::Add => json!(operands[0].as_i64().unwrap() + operands[1].as_i64().unwrap()),
//!         _ => default_evaluator(operator, operands),
//!     })
//!     .unwrap();
//!
//! assert_eq!(filter, json!({ ">=": ["age", 27] }));
//! ```

pub mod ast;
pub mod config;
pub mod lexer;
pub mod operator;
pub mod parser;

pub use ast::{Expr, Node, Operand, default_evaluator};
pub use config::{ConfigError, ParserConfig};
pub use lexer::{Literal, Span, Token, TokenKind, Tokenizer, TokenizerConfig};
pub use operator::{Arity, Operator, OperatorTable};
pub use parser::{Parsed, SyntaxError, WhereParser};
