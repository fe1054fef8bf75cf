//! Token classification shared by both parsing strategies.
//!
//! Wraps the input in one implicit pair of parentheses and decides, from
//! context, what every token means: operator or operand, binary or prefix
//! minus, logical `AND` or the separator of `BETWEEN`. A parenthesized group
//! right after `IN` is captured whole as a literal list.

use tracing::trace;

use super::SyntaxError;
use crate::ast::{Expr, Node, Operand};
use crate::lexer::{Span, Token, TokenKind};
use crate::operator::{Operator, OperatorTable};

/// A classified token.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Item {
    Open(Span),
    Close(Span),
    Operand(Operand, Span),
    Operator(Operator, Span),
    /// The `AND` of `BETWEEN ... AND ...`.
    Separator(Span),
    /// A literal list captured after `IN`.
    List(Vec<Element>, Span),
}

/// An element of a literal list.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Element {
    Operand(Operand),
    List(Vec<Element>),
}

impl Element {
    fn node(&self) -> Node {
        match self {
            Self::Operand(operand) => Node::Operand(operand.clone()),
            Self::List(elements) => list_node(elements),
        }
    }

    fn expr(&self) -> Expr {
        match self {
            Self::Operand(operand) => Expr::Operand(operand.clone()),
            Self::List(elements) => list_expr(elements),
        }
    }
}

pub(crate) fn list_node(elements: &[Element]) -> Node {
    Node::List(elements.iter().map(Element::node).collect())
}

pub(crate) fn list_expr(elements: &[Element]) -> Expr {
    Expr::List(elements.iter().map(Element::expr).collect())
}

/// Classifies `tokens`, read from a source of `len` bytes.
///
/// # Errors
///
/// Returns [`SyntaxError::UnmatchedParenthesis`] for a `)` without a `(`, or
/// a `(` that is never closed.
pub(crate) fn classify(
    tokens: &[Token],
    table: &OperatorTable,
    len: usize,
) -> Result<Vec<Item>, SyntaxError> {
    let classifier = Classifier {
        tokens,
        table,
        position: 0,
        items: Vec::with_capacity(tokens.len() + 2),
        opens: Vec::new(),
        between: Vec::new(),
    };
    classifier.run(len)
}

struct Classifier<'a> {
    tokens: &'a [Token],
    table: &'a OperatorTable,
    position: usize,
    items: Vec<Item>,
    /// Spans of the parentheses still open.
    opens: Vec<Span>,
    /// Parenthesis depths of the `BETWEEN`s still waiting for their `AND`.
    between: Vec<usize>,
}

impl Classifier<'_> {
    fn run(mut self, len: usize) -> Result<Vec<Item>, SyntaxError> {
        let tokens = self.tokens;
        self.push(Item::Open(Span::at(0)));

        while let Some(token) = tokens.get(self.position) {
            self.position += 1;
            let span = token.span;
            match &token.kind {
                TokenKind::Punctuation('(') => {
                    self.opens.push(span);
                    self.push(Item::Open(span));
                }
                TokenKind::Punctuation(')') => {
                    if self.opens.pop().is_none() {
                        return Err(SyntaxError::UnmatchedParenthesis { span });
                    }
                    let depth = self.opens.len();
                    while self.between.last().is_some_and(|&at| at > depth) {
                        self.between.pop();
                    }
                    self.push(Item::Close(span));
                }
                TokenKind::Literal { value, .. } => {
                    self.push(Item::Operand(Operand::Literal(value.clone()), span));
                }
                TokenKind::Punctuation(_) | TokenKind::Operator(_) | TokenKind::Identifier(_) => {
                    self.word(token)?;
                }
            }
        }

        if let Some(&span) = self.opens.last() {
            return Err(SyntaxError::UnmatchedParenthesis { span });
        }
        self.push(Item::Close(Span::at(len)));
        Ok(self.items)
    }

    fn word(&mut self, token: &Token) -> Result<(), SyntaxError> {
        let span = token.span;
        let Some(word) = token.word() else {
            return Ok(());
        };

        if word.eq_ignore_ascii_case("AND") && self.between.last() == Some(&self.opens.len()) {
            self.between.pop();
            self.push(Item::Separator(span));
            return Ok(());
        }

        let Some(operator) = self.table.get(word) else {
            self.push(Item::Operand(Operand::Identifier(word.to_string()), span));
            return Ok(());
        };

        let operator = match operator {
            Operator::Subtract if self.expects_operand() => {
                self.table.negation().unwrap_or(Operator::Subtract)
            }
            other => other.clone(),
        };

        match operator {
            Operator::Between => self.between.push(self.opens.len()),
            Operator::In => {
                if let Some(open) = self.tokens.get(self.position).filter(|t| t.is_open_paren()) {
                    let open = open.span;
                    self.position += 1;
                    self.push(Item::Operator(operator, span));
                    let (elements, list_span) = self.list(open)?;
                    self.push(Item::List(elements, list_span));
                    return Ok(());
                }
            }
            _ => {}
        }

        self.push(Item::Operator(operator, span));
        Ok(())
    }

    /// Reads a literal list whose `(` has been consumed.
    fn list(&mut self, open: Span) -> Result<(Vec<Element>, Span), SyntaxError> {
        let tokens = self.tokens;
        let mut elements = Vec::new();

        while let Some(token) = tokens.get(self.position) {
            self.position += 1;
            match &token.kind {
                TokenKind::Punctuation('(') => {
                    let (nested, _) = self.list(token.span)?;
                    elements.push(Element::List(nested));
                }
                TokenKind::Punctuation(')') => {
                    return Ok((collapse(elements), open.merge(token.span)));
                }
                TokenKind::Punctuation(',') => {}
                TokenKind::Literal { value, .. } => {
                    elements.push(Element::Operand(Operand::Literal(value.clone())));
                }
                TokenKind::Operator(symbol) if symbol == "-" => {
                    let negated = match tokens.get(self.position) {
                        Some(Token {
                            kind: TokenKind::Literal { value, quote: None },
                            ..
                        }) => value.negated(),
                        _ => None,
                    };
                    match negated {
                        Some(value) => {
                            self.position += 1;
                            elements.push(Element::Operand(Operand::Literal(value)));
                        }
                        None => elements.push(Element::Operand(Operand::Identifier(symbol.clone()))),
                    }
                }
                TokenKind::Operator(text) | TokenKind::Identifier(text) => {
                    elements.push(Element::Operand(Operand::Identifier(text.clone())));
                }
                TokenKind::Punctuation(c) => {
                    elements.push(Element::Operand(Operand::Identifier(c.to_string())));
                }
            }
        }

        Err(SyntaxError::UnmatchedParenthesis { span: open })
    }

    /// Returns true where a `-` is the prefix minus.
    fn expects_operand(&self) -> bool {
        matches!(
            self.items.last(),
            None | Some(Item::Open(_) | Item::Operator(..) | Item::Separator(_))
        )
    }

    fn push(&mut self, item: Item) {
        trace!(?item, "classified");
        self.items.push(item);
    }
}

/// Drops redundant nesting: `((a, b))` is the list `(a, b)`.
fn collapse(mut elements: Vec<Element>) -> Vec<Element> {
    if let [Element::List(_)] = elements.as_slice() {
        if let Some(Element::List(inner)) = elements.pop() {
            return inner;
        }
    }
    elements
}
