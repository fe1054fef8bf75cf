//! Character-level tokenizer state machine.
//!
//! The scanner is fed one character at a time and hands every completed
//! token to a sink. All of its state lives in the struct, so feeding the
//! input in arbitrary chunks produces exactly the tokens a single pass over
//! the concatenated input would.

use tracing::debug;

use super::{Literal, Span, Token, TokenKind, Tokenizer};

/// What the scanner is currently accumulating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Between tokens.
    Neutral,
    /// Inside a bare word.
    Word,
    /// Inside a literal opened by the given quote character.
    Quoted(char),
}

/// Resumable tokenizer state.
#[derive(Debug)]
pub(crate) struct Scanner<'t> {
    tokenizer: &'t Tokenizer,
    mode: Mode,
    buffer: String,
    /// Byte offset of the first character held in `buffer` (or of the
    /// opening quote in quoted mode).
    buffer_start: usize,
    /// Byte offset of the next character to be consumed.
    offset: usize,
    /// The previous quoted-mode character was an unescaped backslash.
    escaped: bool,
}

impl<'t> Scanner<'t> {
    pub(crate) const fn new(tokenizer: &'t Tokenizer) -> Self {
        Self {
            tokenizer,
            mode: Mode::Neutral,
            buffer: String::new(),
            buffer_start: 0,
            offset: 0,
            escaped: false,
        }
    }

    /// Byte offset of the next character.
    pub(crate) const fn offset(&self) -> usize {
        self.offset
    }

    /// Consumes every character of `chunk`.
    pub(crate) fn feed(&mut self, chunk: &str, emit: &mut impl FnMut(Token)) {
        for c in chunk.chars() {
            self.consume(c, emit);
            self.offset += c.len_utf8();
        }
    }

    /// Closes whatever mode is still open at end of input.
    pub(crate) fn finish(&mut self, emit: &mut impl FnMut(Token)) {
        match self.mode {
            Mode::Neutral => {}
            Mode::Word => self.flush_word(emit),
            Mode::Quoted(quote) => {
                debug!(
                    quote = %quote,
                    start = self.buffer_start,
                    "closing unterminated quoted literal at end of input"
                );
                self.flush_quoted(quote, self.offset, emit);
            }
        }
        self.mode = Mode::Neutral;
    }

    fn consume(&mut self, c: char, emit: &mut impl FnMut(Token)) {
        match self.mode {
            Mode::Neutral => self.consume_neutral(c, emit),
            Mode::Word => self.consume_word(c, emit),
            Mode::Quoted(quote) => self.consume_quoted(quote, c, emit),
        }
    }

    fn consume_neutral(&mut self, c: char, emit: &mut impl FnMut(Token)) {
        if self.tokenizer.is_quote(c) {
            self.open_quote(c);
        } else if !self.tokenizer.is_delimiter(c) {
            self.mode = Mode::Word;
            self.buffer_start = self.offset;
            self.consume_word(c, emit);
        }
    }

    fn consume_word(&mut self, c: char, emit: &mut impl FnMut(Token)) {
        if self.tokenizer.is_delimiter(c) {
            self.flush_word(emit);
            self.mode = Mode::Neutral;
            return;
        }

        if self.tokenizer.is_quote(c) {
            // A quote right after a symbol opens a literal; inside a word it is text.
            self.split_symbols(true, emit);
            if self.buffer.is_empty() {
                self.open_quote(c);
            } else {
                self.buffer.push(c);
                self.split_symbols(false, emit);
            }
            return;
        }

        self.buffer.push(c);
        self.split_symbols(false, emit);
        if self.buffer.is_empty() {
            self.mode = Mode::Neutral;
        }
    }

    fn consume_quoted(&mut self, quote: char, c: char, emit: &mut impl FnMut(Token)) {
        if c == quote {
            if self.escaped {
                self.buffer.pop();
                self.buffer.push(c);
                self.escaped = false;
            } else {
                self.flush_quoted(quote, self.offset + c.len_utf8(), emit);
                self.mode = Mode::Neutral;
            }
            return;
        }

        self.escaped = c == '\\' && !self.escaped;
        self.buffer.push(c);
    }

    fn open_quote(&mut self, quote: char) {
        self.mode = Mode::Quoted(quote);
        self.buffer.clear();
        self.buffer_start = self.offset;
        self.escaped = false;
    }

    /// Splits every configured symbol out of the word buffer.
    ///
    /// Unless `at_boundary` is set, a symbol that could still grow into a
    /// longer configured symbol is left in the buffer for the next character.
    fn split_symbols(&mut self, at_boundary: bool, emit: &mut impl FnMut(Token)) {
        while let Some((at, len)) = self.tokenizer.find_symbol(&self.buffer, at_boundary) {
            let tail = self.buffer.split_off(at + len);
            let symbol = self.buffer.split_off(at);
            let word = core::mem::replace(&mut self.buffer, tail);

            let symbol_start = self.buffer_start + at;
            if !word.is_empty() {
                emit(word_token(word, Span::new(self.buffer_start, symbol_start)));
            }
            emit(symbol_token(symbol, Span::new(symbol_start, symbol_start + len)));
            self.buffer_start = symbol_start + len;
        }
    }

    fn flush_word(&mut self, emit: &mut impl FnMut(Token)) {
        self.split_symbols(true, emit);
        if !self.buffer.is_empty() {
            let word = core::mem::take(&mut self.buffer);
            let span = Span::new(self.buffer_start, self.buffer_start + word.len());
            emit(word_token(word, span));
        }
    }

    fn flush_quoted(&mut self, quote: char, end: usize, emit: &mut impl FnMut(Token)) {
        let text = core::mem::take(&mut self.buffer);
        self.escaped = false;
        emit(Token::new(
            TokenKind::Literal {
                value: Literal::String(text),
                quote: Some(quote),
            },
            Span::new(self.buffer_start, end),
        ));
    }
}

fn word_token(word: String, span: Span) -> Token {
    let kind = match Literal::from_word(&word) {
        Some(value) => TokenKind::Literal { value, quote: None },
        None => TokenKind::Identifier(word),
    };
    Token::new(kind, span)
}

fn symbol_token(symbol: String, span: Span) -> Token {
    let kind = match symbol.as_str() {
        "(" => TokenKind::Punctuation('('),
        ")" => TokenKind::Punctuation(')'),
        "," => TokenKind::Punctuation(','),
        _ => TokenKind::Operator(symbol),
    };
    Token::new(kind, span)
}
