//! Configurable WHERE-clause tokenizer.

use serde::{Deserialize, Serialize};

use super::scanner::Scanner;
use super::{Token, TokenStream};
use crate::config::ConfigError;

/// Lexical rules used by the [`Tokenizer`].
///
/// Each field fully replaces its default when set. Use
/// [`TokenizerConfig::with_symbol`] to extend the defaults instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenizerConfig {
    /// Symbols that always form their own token, even inside a word.
    pub symbols: Vec<String>,
    /// Characters that open (and close) a verbatim literal.
    pub quotes: Vec<char>,
    /// Characters that end a bare word without producing a token.
    pub delimiters: Vec<char>,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            symbols: [
                "(", ")", ",", "*", "/", "%", "+", "-", "=", "!=", "<", ">", "<=", ">=",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            quotes: vec!['"', '\'', '`'],
            delimiters: vec![' ', '\n', '\r', '\t'],
        }
    }
}

impl TokenizerConfig {
    /// Adds a stand-alone symbol, keeping the ones already configured.
    #[must_use]
    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        let symbol = symbol.into();
        if !self.symbols.contains(&symbol) {
            self.symbols.push(symbol);
        }
        self
    }
}

/// Splits WHERE-clause text into [`Token`]s.
///
/// The tokenizer never fails: unterminated quotes are closed at the end of
/// the input.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    config: TokenizerConfig,
    /// Configured symbols, longest first.
    symbols: Vec<String>,
    /// Byte length of the longest symbol.
    longest: usize,
}

impl Tokenizer {
    /// Creates a tokenizer from the given rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptySymbol`] if a configured symbol is empty.
    pub fn new(config: TokenizerConfig) -> Result<Self, ConfigError> {
        if config.symbols.iter().any(String::is_empty) {
            return Err(ConfigError::EmptySymbol);
        }
        Ok(Self::from_config(config))
    }

    /// Returns the rules this tokenizer was built from.
    #[must_use]
    pub const fn config(&self) -> &TokenizerConfig {
        &self.config
    }

    /// Tokenizes the entire input.
    #[must_use]
    pub fn tokenize(&self, input: &str) -> Vec<Token> {
        self.tokenize_with(input, |_| {})
    }

    /// Tokenizes the entire input, calling `on_token` as each token completes.
    pub fn tokenize_with(&self, input: &str, mut on_token: impl FnMut(&Token)) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut emit = |token: Token| {
            on_token(&token);
            tokens.push(token);
        };
        let mut scanner = Scanner::new(self);
        scanner.feed(input, &mut emit);
        scanner.finish(&mut emit);
        tokens
    }

    /// Starts an incremental tokenization.
    #[must_use]
    pub const fn stream(&self) -> TokenStream<'_> {
        TokenStream::new(self)
    }

    pub(crate) fn is_quote(&self, c: char) -> bool {
        self.config.quotes.contains(&c)
    }

    pub(crate) fn is_delimiter(&self, c: char) -> bool {
        self.config.delimiters.contains(&c)
    }

    fn from_config(config: TokenizerConfig) -> Self {
        let mut symbols = config.symbols.clone();
        symbols.sort_by_key(|symbol| core::cmp::Reverse(symbol.len()));
        let longest = symbols.first().map_or(0, String::len);
        Self {
            config,
            symbols,
            longest,
        }
    }

    /// Finds the leftmost symbol in `buffer`, returning its byte offset and length.
    ///
    /// Without `at_boundary`, scanning stops at the first position whose
    /// remaining text is a proper prefix of a longer symbol.
    ///
    /// Only the last `longest` bytes are scanned. The scanner calls this
    /// after every character, so any earlier position was already found to
    /// hold neither a symbol nor the start of one.
    pub(crate) fn find_symbol(&self, buffer: &str, at_boundary: bool) -> Option<(usize, usize)> {
        let mut from = buffer.len().saturating_sub(self.longest);
        while !buffer.is_char_boundary(from) {
            from -= 1;
        }
        for (offset, _) in buffer[from..].char_indices() {
            let at = from + offset;
            let rest = &buffer[at..];
            if !at_boundary
                && self
                    .symbols
                    .iter()
                    .any(|symbol| symbol.len() > rest.len() && symbol.starts_with(rest))
            {
                return None;
            }
            if let Some(symbol) = self.symbols.iter().find(|symbol| rest.starts_with(symbol.as_str())) {
                return Some((at, symbol.len()));
            }
        }
        None
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::from_config(TokenizerConfig::default())
    }
}
