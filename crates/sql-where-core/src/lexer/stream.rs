//! Incremental tokenization.

use super::scanner::Scanner;
use super::{Token, Tokenizer};

/// A tokenization fed chunk by chunk.
///
/// Tokens are handed out as soon as they are complete. A token that spans a
/// chunk boundary is held back until the chunk that completes it, so the
/// concatenation of everything returned by [`feed`](Self::feed) and
/// [`finish`](Self::finish) equals [`Tokenizer::tokenize`] over the
/// concatenated input, spans included.
///
/// ```rust
/// use sql_where_core::lexer::Tokenizer;
///
/// let tokenizer = Tokenizer::default();
/// let mut stream = tokenizer.stream();
/// let mut tokens = stream.feed("age >");
/// tokens.extend(stream.feed("= 27"));
/// tokens.extend(stream.finish());
/// assert_eq!(tokens, tokenizer.tokenize("age >= 27"));
/// ```
#[derive(Debug)]
pub struct TokenStream<'t> {
    scanner: Scanner<'t>,
}

impl<'t> TokenStream<'t> {
    pub(crate) const fn new(tokenizer: &'t Tokenizer) -> Self {
        Self {
            scanner: Scanner::new(tokenizer),
        }
    }

    /// Consumes the next chunk and returns the tokens it completed.
    pub fn feed(&mut self, chunk: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        self.scanner.feed(chunk, &mut |token| tokens.push(token));
        tokens
    }

    /// Ends the input and returns the tokens still buffered.
    #[must_use]
    pub fn finish(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        self.scanner.finish(&mut |token| tokens.push(token));
        tokens
    }

    /// Number of bytes consumed so far.
    #[must_use]
    pub const fn consumed(&self) -> usize {
        self.scanner.offset()
    }
}
