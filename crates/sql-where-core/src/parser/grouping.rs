//! Bracket-and-resolve parsing.
//!
//! Two builders consume the classified items side by side. Each keeps an
//! output buffer and a stack of the buffer offsets where the open groups
//! start. When a group closes, its contents are split off the buffer and
//! pushed back as a single node: verbatim for the display form, after a
//! precedence pass for the resolved form.
//!
//! The precedence pass walks the tiers tightest first. Within a tier, prefix
//! operators are resolved right to left so `- - 5` nests, then the other
//! operators left to right so equal precedence associates to the left. Each
//! walk rebuilds the buffer instead of splicing it in place.

use tracing::trace;

use super::SyntaxError;
use super::classify::{Item, list_expr, list_node};
use crate::ast::{Expr, Node};
use crate::lexer::Span;
use crate::operator::{Arity, Operator, OperatorTable};

/// The precedence-resolved form of a parsed clause.
#[derive(Debug)]
pub(crate) struct Resolved {
    pub(crate) node: Node,
    pub(crate) expr: Expr,
    pub(crate) span: Span,
}

/// An element of an open group.
#[derive(Debug)]
enum Piece {
    Value(Resolved),
    Operator(Operator, Span),
    Separator(Span),
}

impl Piece {
    const fn span(&self) -> Span {
        match self {
            Self::Value(resolved) => resolved.span,
            Self::Operator(_, span) | Self::Separator(span) => *span,
        }
    }
}

/// Builds both bracketed forms.
///
/// Returns the resolved form and the display form.
pub(crate) fn bracket(
    items: Vec<Item>,
    table: &OperatorTable,
) -> Result<(Resolved, Node), SyntaxError> {
    let mut display = DisplayBuilder::default();
    let mut resolver = Resolver::new(table);
    for item in items {
        display.push(&item);
        resolver.push(item)?;
    }
    Ok((resolver.finish()?, display.finish()))
}

/// Builds the display form alone.
pub(crate) fn display(items: &[Item]) -> Node {
    let mut display = DisplayBuilder::default();
    for item in items {
        display.push(item);
    }
    display.finish()
}

/// Groups nodes by the source's parentheses only.
#[derive(Debug, Default)]
struct DisplayBuilder {
    output: Vec<Node>,
    scopes: Vec<usize>,
}

impl DisplayBuilder {
    fn push(&mut self, item: &Item) {
        let node = match item {
            Item::Open(_) => {
                self.scopes.push(self.output.len());
                return;
            }
            Item::Close(_) => {
                let start = self.scopes.pop().unwrap_or_default();
                collapse(self.output.split_off(start))
            }
            Item::Operand(operand, _) => Node::Operand(operand.clone()),
            Item::Operator(operator, _) => Node::Operator(operator.clone()),
            Item::Separator(_) => Node::Separator,
            Item::List(elements, _) => list_node(elements),
        };
        self.output.push(node);
    }

    fn finish(mut self) -> Node {
        self.output.pop().unwrap_or_else(|| Node::Group(Vec::new()))
    }
}

/// A group holding a single node is that node.
fn collapse(mut group: Vec<Node>) -> Node {
    if group.len() == 1 {
        if let Some(node) = group.pop() {
            return node;
        }
    }
    Node::Group(group)
}

/// Groups nodes by operator precedence.
#[derive(Debug)]
struct Resolver<'t> {
    table: &'t OperatorTable,
    output: Vec<Piece>,
    /// Start offset and `(` span of every open group.
    scopes: Vec<(usize, Span)>,
}

impl<'t> Resolver<'t> {
    const fn new(table: &'t OperatorTable) -> Self {
        Self {
            table,
            output: Vec::new(),
            scopes: Vec::new(),
        }
    }

    /// Adds an item to the innermost open group.
    ///
    /// Misplaced items are rejected as they arrive, in the same order the
    /// shunting-yard fold finds them.
    fn push(&mut self, item: Item) -> Result<(), SyntaxError> {
        let piece = match item {
            Item::Open(span) => {
                self.operand_position(span)?;
                self.scopes.push((self.output.len(), span));
                return Ok(());
            }
            Item::Close(span) => {
                let Some(&(start, open)) = self.scopes.last() else {
                    return Err(SyntaxError::UnmatchedParenthesis { span });
                };
                if self.output.len() > start {
                    self.operand_complete()?;
                }
                self.scopes.pop();
                let group = self.output.split_off(start);
                Piece::Value(self.resolve(group, open.merge(span))?)
            }
            Item::Operand(operand, span) => {
                self.operand_position(span)?;
                Piece::Value(Resolved {
                    node: Node::Operand(operand.clone()),
                    expr: Expr::Operand(operand),
                    span,
                })
            }
            Item::Operator(operator, span) if operator.is_prefix() => {
                self.operand_position(span)?;
                if let Some((waiting, at)) = self.waiting() {
                    if self.table.binds_tighter(waiting, &operator) {
                        return Err(SyntaxError::MissingOperand {
                            operator: waiting.clone(),
                            span: at,
                        });
                    }
                }
                Piece::Operator(operator, span)
            }
            Item::Operator(operator, span) => {
                if self.expects_operand() {
                    return Err(SyntaxError::MissingOperand { operator, span });
                }
                Piece::Operator(operator, span)
            }
            Item::Separator(span) => {
                self.operand_complete()?;
                Piece::Separator(span)
            }
            Item::List(elements, span) => {
                self.operand_position(span)?;
                Piece::Value(Resolved {
                    node: list_node(&elements),
                    expr: list_expr(&elements),
                    span,
                })
            }
        };
        self.output.push(piece);
        Ok(())
    }

    fn finish(mut self) -> Result<Resolved, SyntaxError> {
        if let Some(&(_, span)) = self.scopes.last() {
            return Err(SyntaxError::UnmatchedParenthesis { span });
        }
        let output = core::mem::take(&mut self.output);
        self.resolve(output, Span::default())
    }

    /// The pieces of the innermost open group.
    fn group(&self) -> &[Piece] {
        let start = self.scopes.last().map_or(0, |&(start, _)| start);
        &self.output[start..]
    }

    /// The group is empty or ends on an operator or separator.
    fn expects_operand(&self) -> bool {
        !matches!(self.group().last(), Some(Piece::Value(_)))
    }

    /// The operator still waiting for the next operand.
    ///
    /// After a separator that is the `BETWEEN` it belongs to.
    fn waiting(&self) -> Option<(&Operator, Span)> {
        let group = self.group();
        match group.last()? {
            Piece::Operator(operator, span) => Some((operator, *span)),
            Piece::Separator(_) => {
                let mut depth = 0usize;
                for piece in group.iter().rev().skip(1) {
                    match piece {
                        Piece::Separator(_) => depth += 1,
                        Piece::Operator(operator @ Operator::Between, span) => {
                            if depth == 0 {
                                return Some((operator, *span));
                            }
                            depth -= 1;
                        }
                        _ => {}
                    }
                }
                None
            }
            Piece::Value(_) => None,
        }
    }

    /// Fails if a value arrives right after another value.
    fn operand_position(&self, span: Span) -> Result<(), SyntaxError> {
        if self.expects_operand() {
            Ok(())
        } else {
            Err(SyntaxError::MissingOperator { span })
        }
    }

    /// Fails if the group ends on an operator or separator.
    fn operand_complete(&self) -> Result<(), SyntaxError> {
        match self.waiting() {
            Some((operator, span)) => Err(SyntaxError::MissingOperand {
                operator: operator.clone(),
                span,
            }),
            None => Ok(()),
        }
    }

    /// Resolves the contents of one group into a single value.
    fn resolve(&self, mut pieces: Vec<Piece>, span: Span) -> Result<Resolved, SyntaxError> {
        if pieces.is_empty() {
            return Ok(Resolved {
                node: Node::List(Vec::new()),
                expr: Expr::List(Vec::new()),
                span,
            });
        }

        for (precedence, tier) in self.table.tiers().iter().enumerate() {
            let present = pieces
                .iter()
                .any(|piece| matches!(piece, Piece::Operator(operator, _) if tier.contains(operator)));
            if !present {
                continue;
            }
            trace!(precedence, pieces = pieces.len(), "resolving tier");
            pieces = resolve_prefix(pieces, tier)?;
            pieces = resolve_infix(pieces, tier)?;
        }

        let leftover = pieces.get(1).map(Piece::span);
        match <[Piece; 1]>::try_from(pieces) {
            Ok([Piece::Value(resolved)]) => Ok(resolved),
            Ok([other]) => Err(SyntaxError::MissingOperator { span: other.span() }),
            Err(_) => Err(SyntaxError::MissingOperator {
                span: leftover.unwrap_or(span),
            }),
        }
    }
}

/// Applies the prefix operators of `tier`, right to left.
fn resolve_prefix(pieces: Vec<Piece>, tier: &[Operator]) -> Result<Vec<Piece>, SyntaxError> {
    let mut reversed: Vec<Piece> = Vec::with_capacity(pieces.len());
    for piece in pieces.into_iter().rev() {
        match piece {
            Piece::Operator(operator, span) if operator.is_prefix() && tier.contains(&operator) => {
                let operand = operand(reversed.pop(), &operator, span)?;
                reversed.push(Piece::Value(operation(operator, span, vec![operand])));
            }
            other => reversed.push(other),
        }
    }
    reversed.reverse();
    Ok(reversed)
}

/// Applies the binary and ternary operators of `tier`, left to right.
fn resolve_infix(pieces: Vec<Piece>, tier: &[Operator]) -> Result<Vec<Piece>, SyntaxError> {
    let mut output: Vec<Piece> = Vec::with_capacity(pieces.len());
    let mut rest = pieces.into_iter();

    while let Some(piece) = rest.next() {
        let (operator, span) = match piece {
            Piece::Operator(operator, span) if !operator.is_prefix() && tier.contains(&operator) => {
                (operator, span)
            }
            other => {
                output.push(other);
                continue;
            }
        };

        let left = operand(output.pop(), &operator, span)?;
        let right = operand(rest.next(), &operator, span)?;
        let resolved = match operator {
            Operator::Between => {
                if !matches!(rest.next(), Some(Piece::Separator(_))) {
                    return Err(SyntaxError::MalformedBetween { span });
                }
                let high = operand(rest.next(), &operator, span)?;
                operation(operator, span, vec![left, right, high])
            }
            Operator::In if !matches!(right.expr, Expr::List(_)) => {
                return Err(SyntaxError::InvalidInTarget { span: right.span });
            }
            Operator::Comma => concat(left, right),
            _ => operation(operator, span, vec![left, right]),
        };
        output.push(Piece::Value(resolved));
    }

    Ok(output)
}

/// Takes the piece in an operand slot, which must be a value.
fn operand(piece: Option<Piece>, operator: &Operator, span: Span) -> Result<Resolved, SyntaxError> {
    match piece {
        Some(Piece::Value(resolved)) => Ok(resolved),
        _ => Err(SyntaxError::MissingOperand {
            operator: operator.clone(),
            span,
        }),
    }
}

/// Lays out an operation as a group: `[op, x]`, `[x, op, y]` or
/// `[x, op, low, AND, high]`.
fn operation(operator: Operator, span: Span, operands: Vec<Resolved>) -> Resolved {
    let span = operands.iter().fold(span, |span, operand| span.merge(operand.span));
    let arity = operator.arity();
    let mut nodes = Vec::with_capacity(operands.len() + 2);
    let mut exprs = Vec::with_capacity(operands.len());

    for (index, operand) in operands.into_iter().enumerate() {
        match (arity, index) {
            (Arity::Unary, 0) | (Arity::Binary | Arity::Ternary, 1) => {
                nodes.push(Node::Operator(operator.clone()));
            }
            (Arity::Ternary, 2) => nodes.push(Node::Separator),
            _ => {}
        }
        nodes.push(operand.node);
        exprs.push(operand.expr);
    }

    Resolved {
        node: Node::Group(nodes),
        expr: Expr::Operation {
            operator,
            operands: exprs,
        },
        span,
    }
}

/// Joins two comma operands into one list, flattening list operands.
fn concat(left: Resolved, right: Resolved) -> Resolved {
    let span = left.span.merge(right.span);
    let mut nodes = Vec::new();
    let mut exprs = Vec::new();

    for operand in [left, right] {
        match (operand.node, operand.expr) {
            (Node::List(node_items), Expr::List(expr_items)) => {
                nodes.extend(node_items);
                exprs.extend(expr_items);
            }
            (node, expr) => {
                nodes.push(node);
                exprs.push(expr);
            }
        }
    }

    Resolved {
        node: Node::List(nodes),
        expr: Expr::List(exprs),
        span,
    }
}
