//! Parser configuration.
//!
//! A [`ParserConfig`] holds the operator precedence table and the
//! tokenizer rules. It can be built in code or loaded from JSON:
//!
//! ```rust
//! use sql_where_core::config::ParserConfig;
//!
//! let config = ParserConfig::from_json(r#"{ "operators": [{ "AND": 2 }, { "OR": 2 }] }"#).unwrap();
//! assert_eq!(config.operators.len(), 2);
//! // Omitted sections keep their defaults.
//! assert_eq!(config.tokenizer.quotes, vec!['"', '\'', '`']);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::lexer::TokenizerConfig;
use crate::operator::{Arity, DEFAULT_TIERS};

/// Errors raised while validating a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A tokenizer symbol or operator name is the empty string.
    #[error("operator and tokenizer symbols must not be empty")]
    EmptySymbol,

    /// The same operator appears twice in the table.
    #[error("operator '{0}' is configured more than once")]
    DuplicateOperator(String),

    /// A built-in operator was given an arity other than its own.
    #[error("operator '{operator}' takes {expected} operand(s), configured with {found}")]
    ArityMismatch {
        /// The operator symbol.
        operator: String,
        /// The built-in arity.
        expected: u8,
        /// The configured arity.
        found: u8,
    },

    /// A custom operator was declared ternary.
    #[error("operator '{operator}' cannot take {arity} operands: only BETWEEN is ternary")]
    UnsupportedArity {
        /// The operator symbol.
        operator: String,
        /// The configured arity.
        arity: u8,
    },

    /// An arity outside 1..=3.
    #[error("arity must be 1, 2 or 3, got {0}")]
    InvalidArity(u8),

    /// The JSON document could not be read.
    #[error("invalid parser configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Operator table and tokenizer rules for a [`WhereParser`](crate::WhereParser).
///
/// `operators` lists precedence tiers from tightest to loosest binding, each
/// mapping an operator symbol to its arity. Setting a field replaces the
/// default entirely; [`with_operator`](Self::with_operator) and
/// [`TokenizerConfig::with_symbol`] merge into it instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Precedence tiers, tightest first.
    pub operators: Vec<BTreeMap<String, Arity>>,
    /// Tokenizer rules.
    pub tokenizer: TokenizerConfig,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            operators: DEFAULT_TIERS
                .iter()
                .map(|tier| {
                    tier.iter()
                        .map(|operator| (operator.symbol().to_string(), operator.arity()))
                        .collect()
                })
                .collect(),
            tokenizer: TokenizerConfig::default(),
        }
    }
}

impl ParserConfig {
    /// Reads a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] if the document is malformed or an
    /// arity is out of range.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Adds an operator to the given tier, creating empty tiers as needed.
    ///
    /// Symbolic operators must also be registered with the tokenizer
    /// through [`TokenizerConfig::with_symbol`].
    #[must_use]
    pub fn with_operator(mut self, tier: usize, symbol: impl Into<String>, arity: Arity) -> Self {
        if self.operators.len() <= tier {
            self.operators.resize_with(tier + 1, BTreeMap::new);
        }
        self.operators[tier].insert(symbol.into(), arity);
        self
    }
}
