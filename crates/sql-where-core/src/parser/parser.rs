//! The WHERE-clause parser.

use serde_json::Value;
use tracing::debug;

use super::SyntaxError;
use super::classify::{Item, classify};
use super::{grouping, shunting};
use crate::ast::{Expr, Node};
use crate::config::{ConfigError, ParserConfig};
use crate::lexer::{Token, Tokenizer};
use crate::operator::{Operator, OperatorTable};

/// The result of [`WhereParser::parse`].
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed {
    /// The tokens of the input.
    pub tokens: Vec<Token>,
    /// Every operation in its own group, by operator precedence.
    pub expression: Node,
    /// Grouped only by the parentheses written in the input.
    pub expression_display: Node,
    /// The operator/operand tree.
    pub expression_tree: Expr,
}

/// Parses WHERE clauses.
///
/// A parser is immutable once built and can be shared between threads.
///
/// ```rust
/// use sql_where_core::WhereParser;
/// use serde_json::json;
///
/// let parser = WhereParser::new();
/// let parsed = parser.parse(r#"name = "Shaun Persad" AND age >= 27"#).unwrap();
/// assert_eq!(
///     parsed.expression_tree.to_json(),
///     json!({ "AND": [{ "=": ["name", "Shaun Persad"] }, { ">=": ["age", 27] }] })
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct WhereParser {
    tokenizer: Tokenizer,
    operators: OperatorTable,
}

impl WhereParser {
    /// Creates a parser with the default operators and tokenizer rules.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a parser from a configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the operator table or the tokenizer
    /// rules are invalid.
    pub fn with_config(config: ParserConfig) -> Result<Self, ConfigError> {
        let operators = OperatorTable::new(&config.operators)?;
        let tokenizer = Tokenizer::new(config.tokenizer)?;
        debug!(
            tiers = config.operators.len(),
            symbols = tokenizer.config().symbols.len(),
            "configured WHERE parser"
        );
        Ok(Self {
            tokenizer,
            operators,
        })
    }

    /// Parses `sql` into its bracketed forms and its tree.
    ///
    /// # Errors
    ///
    /// Returns a [`SyntaxError`] for a missing operand or operator, a
    /// malformed `BETWEEN`, an `IN` without a list, or an unmatched
    /// parenthesis.
    pub fn parse(&self, sql: &str) -> Result<Parsed, SyntaxError> {
        let tokens = self.tokenizer.tokenize(sql);
        let items = self.classify(&tokens, sql)?;
        let (resolved, expression_display) =
            grouping::bracket(items, &self.operators).inspect_err(|err| log_failure(sql, err))?;
        debug!(tokens = tokens.len(), "parsed WHERE clause");
        Ok(Parsed {
            tokens,
            expression: resolved.node,
            expression_display,
            expression_tree: resolved.expr,
        })
    }

    /// Parses `sql`, folding every operation through `evaluator` as soon as
    /// its operands are known.
    ///
    /// The evaluator receives the operator and its folded operands; its
    /// return value stands in for the operation. The result is the same as
    /// [`Expr::evaluate`] on the tree built by [`parse`](Self::parse).
    ///
    /// # Errors
    ///
    /// Returns a [`SyntaxError`] under the same conditions as
    /// [`parse`](Self::parse).
    pub fn parse_with<F>(&self, sql: &str, evaluator: F) -> Result<Value, SyntaxError>
    where
        F: FnMut(&Operator, Vec<Value>) -> Value,
    {
        let tokens = self.tokenizer.tokenize(sql);
        let items = self.classify(&tokens, sql)?;
        let value = shunting::fold(items, &self.operators, evaluator)
            .inspect_err(|err| log_failure(sql, err))?;
        debug!(tokens = tokens.len(), "folded WHERE clause");
        Ok(value)
    }

    /// Groups `sql` by its own parentheses, without resolving precedence.
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError::UnmatchedParenthesis`] if the parentheses do
    /// not balance.
    pub fn to_array(&self, sql: &str) -> Result<Node, SyntaxError> {
        let tokens = self.tokenizer.tokenize(sql);
        let items = self.classify(&tokens, sql)?;
        Ok(grouping::display(&items))
    }

    /// Tokenizes `sql`.
    #[must_use]
    pub fn tokenize(&self, sql: &str) -> Vec<Token> {
        self.tokenizer.tokenize(sql)
    }

    /// Tokenizes `sql`, calling `on_token` as each token completes.
    pub fn tokenize_with(&self, sql: &str, on_token: impl FnMut(&Token)) -> Vec<Token> {
        self.tokenizer.tokenize_with(sql, on_token)
    }

    /// Returns the tokenizer.
    #[must_use]
    pub const fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// Returns the operator table.
    #[must_use]
    pub const fn operators(&self) -> &OperatorTable {
        &self.operators
    }

    fn classify(&self, tokens: &[Token], sql: &str) -> Result<Vec<Item>, SyntaxError> {
        classify(tokens, &self.operators, sql.len()).inspect_err(|err| log_failure(sql, err))
    }
}

fn log_failure(sql: &str, err: &SyntaxError) {
    debug!(error = %err, span = %err.span(), len = sql.len(), "rejected WHERE clause");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::default_evaluator;
    use crate::lexer::TokenizerConfig;
    use crate::operator::Arity;
    use serde_json::json;

    #[test]
    fn test_parse_outputs() {
        let parser = WhereParser::new();
        let parsed = parser.parse("(a = 1) AND b").unwrap();
        assert_eq!(parsed.tokens.len(), 7);
        assert_eq!(
            serde_json::to_value(&parsed.expression).unwrap(),
            json!([["a", "=", 1], "AND", "b"])
        );
        assert_eq!(
            serde_json::to_value(&parsed.expression_display).unwrap(),
            json!([["a", "=", 1], "AND", "b"])
        );
        assert_eq!(
            parsed.expression_tree.to_json(),
            json!({ "AND": [{ "=": ["a", 1] }, "b"] })
        );
    }

    #[test]
    fn test_parse_with_matches_tree() {
        let parser = WhereParser::new();
        let sql = "x BETWEEN -1 AND 2 OR NOT y IN (a, b)";
        let folded = parser.parse_with(sql, default_evaluator).unwrap();
        assert_eq!(folded, parser.parse(sql).unwrap().expression_tree.to_json());
    }

    #[test]
    fn test_to_array_skips_precedence() {
        let parser = WhereParser::new();
        // `=` is missing an operand, but grouping alone succeeds.
        let node = parser.to_array("(a =) OR b").unwrap();
        assert_eq!(serde_json::to_value(node).unwrap(), json!([["a", "="], "OR", "b"]));
        assert!(parser.parse("(a =) OR b").is_err());
    }

    #[test]
    fn test_with_config() {
        let config = ParserConfig {
            tokenizer: TokenizerConfig::default().with_symbol("<>"),
            ..ParserConfig::default()
        }
        .with_operator(5, "<>", Arity::Binary);
        let parser = WhereParser::with_config(config).unwrap();
        assert!(parser.operators().get("<>").is_some());
        assert_eq!(
            parser.parse("a <> b").unwrap().expression_tree.to_json(),
            json!({ "<>": ["a", "b"] })
        );
    }

    #[test]
    fn test_parser_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<WhereParser>();
    }
}
