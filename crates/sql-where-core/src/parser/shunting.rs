//! Shunting-yard folding.
//!
//! Operands go straight to a value stack; operators wait on an operator
//! stack until an operator that binds no tighter arrives, and are then
//! reduced by handing their operands to the evaluator. Comma lists and the
//! `IN` target are handled structurally, so the evaluator never sees a
//! comma.

use serde_json::Value;

use super::SyntaxError;
use super::classify::{Item, list_expr};
use crate::lexer::Span;
use crate::operator::{Operator, OperatorTable};

/// Folds classified items with `evaluator`.
pub(crate) fn fold<F>(items: Vec<Item>, table: &OperatorTable, evaluator: F) -> Result<Value, SyntaxError>
where
    F: FnMut(&Operator, Vec<Value>) -> Value,
{
    let mut folder = Folder {
        table,
        evaluator,
        values: Vec::new(),
        pending: Vec::new(),
        expect_operand: true,
    };
    for item in items {
        folder.push(item)?;
    }
    folder.finish()
}

/// A folded value.
#[derive(Debug)]
struct Folded {
    value: Value,
    /// Built from a literal list or by commas.
    list: bool,
    span: Span,
}

#[derive(Debug)]
enum Pending {
    Open {
        span: Span,
        /// Height of the value stack when the group opened.
        base: usize,
    },
    Operator {
        operator: Operator,
        span: Span,
        /// `BETWEEN` has met its `AND`.
        separated: bool,
    },
}

struct Folder<'t, F> {
    table: &'t OperatorTable,
    evaluator: F,
    values: Vec<Folded>,
    pending: Vec<Pending>,
    /// The last item was `(`, an operator or a separator.
    expect_operand: bool,
}

impl<F> Folder<'_, F>
where
    F: FnMut(&Operator, Vec<Value>) -> Value,
{
    fn push(&mut self, item: Item) -> Result<(), SyntaxError> {
        match item {
            Item::Open(span) => {
                self.operand_position(span)?;
                self.pending.push(Pending::Open {
                    span,
                    base: self.values.len(),
                });
            }
            Item::Operand(operand, span) => {
                self.operand_position(span)?;
                self.values.push(Folded {
                    value: operand.to_json(),
                    list: false,
                    span,
                });
                self.expect_operand = false;
            }
            Item::List(elements, span) => {
                self.operand_position(span)?;
                self.values.push(Folded {
                    value: list_expr(&elements).to_json(),
                    list: true,
                    span,
                });
                self.expect_operand = false;
            }
            Item::Operator(operator, span) if operator.is_prefix() => {
                self.operand_position(span)?;
                // A tighter operator waiting for its right operand cannot take a
                // looser prefix expression.
                if let Some(Pending::Operator {
                    operator: waiting,
                    span: at,
                    ..
                }) = self.pending.last()
                {
                    if self.table.binds_tighter(waiting, &operator) {
                        return Err(SyntaxError::MissingOperand {
                            operator: waiting.clone(),
                            span: *at,
                        });
                    }
                }
                self.pending.push(Pending::Operator {
                    operator,
                    span,
                    separated: false,
                });
            }
            Item::Operator(operator, span) => {
                if self.expect_operand {
                    return Err(SyntaxError::MissingOperand { operator, span });
                }
                while let Some(Pending::Operator { operator: waiting, .. }) = self.pending.last() {
                    if !self.table.binds_tighter_or_equal(waiting, &operator) {
                        break;
                    }
                    self.reduce()?;
                }
                self.pending.push(Pending::Operator {
                    operator,
                    span,
                    separated: false,
                });
                self.expect_operand = true;
            }
            Item::Separator(span) => {
                self.operand_complete()?;
                loop {
                    match self.pending.last_mut() {
                        Some(Pending::Operator {
                            operator: Operator::Between,
                            separated,
                            ..
                        }) if !*separated => {
                            *separated = true;
                            break;
                        }
                        Some(Pending::Operator { .. }) => self.reduce()?,
                        _ => return Err(SyntaxError::MalformedBetween { span }),
                    }
                }
                self.expect_operand = true;
            }
            Item::Close(span) => {
                if self.expect_operand {
                    match self.pending.last() {
                        Some(Pending::Open { base, .. }) if *base == self.values.len() => {
                            self.values.push(Folded {
                                value: Value::Array(Vec::new()),
                                list: true,
                                span,
                            });
                        }
                        _ => self.operand_complete()?,
                    }
                }
                loop {
                    match self.pending.last() {
                        Some(Pending::Open { .. }) => break,
                        Some(Pending::Operator { .. }) => self.reduce()?,
                        None => return Err(SyntaxError::UnmatchedParenthesis { span }),
                    }
                }
                self.pending.pop();
                self.expect_operand = false;
            }
        }
        Ok(())
    }

    fn finish(mut self) -> Result<Value, SyntaxError> {
        match self.pending.pop() {
            Some(Pending::Open { span, .. }) => Err(SyntaxError::UnmatchedParenthesis { span }),
            Some(Pending::Operator { operator, span, .. }) => {
                Err(SyntaxError::MissingOperand { operator, span })
            }
            None => {
                let result = self.values.pop();
                match (result, self.values.last()) {
                    (Some(folded), None) => Ok(folded.value),
                    (Some(folded), Some(_)) => Err(SyntaxError::MissingOperator { span: folded.span }),
                    (None, _) => Ok(Value::Array(Vec::new())),
                }
            }
        }
    }

    /// Fails if a value arrives right after another value.
    fn operand_position(&self, span: Span) -> Result<(), SyntaxError> {
        if self.expect_operand {
            Ok(())
        } else {
            Err(SyntaxError::MissingOperator { span })
        }
    }

    /// Fails if the operator on top of the stack still expects an operand.
    fn operand_complete(&self) -> Result<(), SyntaxError> {
        match self.pending.last() {
            Some(Pending::Operator { operator, span, .. }) if self.expect_operand => {
                Err(SyntaxError::MissingOperand {
                    operator: operator.clone(),
                    span: *span,
                })
            }
            _ => Ok(()),
        }
    }

    /// Reduces the operator on top of the stack.
    fn reduce(&mut self) -> Result<(), SyntaxError> {
        let Some(Pending::Operator {
            operator,
            span,
            separated,
        }) = self.pending.pop()
        else {
            return Ok(());
        };

        if operator == Operator::Between && !separated {
            return Err(SyntaxError::MalformedBetween { span });
        }
        let Some(at) = self.values.len().checked_sub(operator.arity().count()) else {
            return Err(SyntaxError::MissingOperand { operator, span });
        };
        let operands = self.values.split_off(at);
        let span = operands.iter().fold(span, |span, operand| span.merge(operand.span));

        if operator == Operator::In {
            if let Some(target) = operands.get(1).filter(|target| !target.list) {
                return Err(SyntaxError::InvalidInTarget { span: target.span });
            }
        }

        let folded = if operator == Operator::Comma {
            let mut items = Vec::new();
            for operand in operands {
                match operand {
                    Folded {
                        value: Value::Array(values),
                        list: true,
                        ..
                    } => items.extend(values),
                    other => items.push(other.value),
                }
            }
            Folded {
                value: Value::Array(items),
                list: true,
                span,
            }
        } else {
            let values = operands.into_iter().map(|operand| operand.value).collect();
            Folded {
                value: (self.evaluator)(&operator, values),
                list: false,
                span,
            }
        };
        self.values.push(folded);
        Ok(())
    }
}
