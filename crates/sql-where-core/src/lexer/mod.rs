//! WHERE-clause tokenizer.
//!
//! A character-level state machine that splits input into punctuation,
//! operator symbols, literals and identifiers. It knows nothing about
//! grammar or precedence.

mod scanner;
mod span;
mod stream;
mod token;
mod tokenizer;

pub use span::Span;
pub use stream::TokenStream;
pub use token::{Literal, Token, TokenKind};
pub use tokenizer::{Tokenizer, TokenizerConfig};
