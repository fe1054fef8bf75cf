//! Operator precedence table.

use std::collections::{BTreeMap, HashMap, HashSet};

use super::kind::DEFAULT_TIERS;
use super::{Arity, Operator};
use crate::config::ConfigError;

/// Operator lookup and precedence.
///
/// Tiers are numbered from the tightest binding. Tier 0 is reserved for the
/// prefix minus, which exists only when `-` is configured; configured tier
/// `i` becomes tier `i + 1`.
#[derive(Debug, Clone)]
pub struct OperatorTable {
    by_symbol: HashMap<String, Operator>,
    precedence: HashMap<Operator, usize>,
    tiers: Vec<Vec<Operator>>,
}

impl OperatorTable {
    /// Builds a table from configured tiers, tightest first.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for an empty or duplicate symbol, a built-in
    /// operator configured with the wrong arity, or a ternary custom operator.
    pub fn new(tiers: &[BTreeMap<String, Arity>]) -> Result<Self, ConfigError> {
        let mut seen = HashSet::new();
        let mut resolved = Vec::with_capacity(tiers.len());

        for tier in tiers {
            let mut operators = Vec::with_capacity(tier.len());
            for (symbol, &arity) in tier {
                if symbol.is_empty() {
                    return Err(ConfigError::EmptySymbol);
                }
                let key = symbol.to_uppercase();
                if !seen.insert(key.clone()) {
                    return Err(ConfigError::DuplicateOperator(symbol.clone()));
                }
                operators.push(classify(key, arity)?);
            }
            resolved.push(operators);
        }

        Ok(Self::from_tiers(resolved))
    }

    fn from_tiers(configured: Vec<Vec<Operator>>) -> Self {
        let negation = configured.iter().flatten().any(|op| *op == Operator::Subtract);
        let mut tiers = Vec::with_capacity(configured.len() + 1);
        tiers.push(if negation { vec![Operator::Negate] } else { Vec::new() });
        tiers.extend(configured);

        let mut by_symbol = HashMap::new();
        let mut precedence = HashMap::new();
        for (index, tier) in tiers.iter().enumerate() {
            for operator in tier {
                if *operator != Operator::Negate {
                    by_symbol.insert(operator.symbol().to_uppercase(), operator.clone());
                }
                precedence.insert(operator.clone(), index);
            }
        }

        Self {
            by_symbol,
            precedence,
            tiers,
        }
    }

    /// Looks up the operator named by `word`, ignoring case.
    #[must_use]
    pub fn get(&self, word: &str) -> Option<&Operator> {
        self.by_symbol.get(&word.to_uppercase())
    }

    /// Returns the tier of `operator`, if it is in the table.
    #[must_use]
    pub fn precedence(&self, operator: &Operator) -> Option<usize> {
        self.precedence.get(operator).copied()
    }

    /// Returns true if `first` binds at least as tightly as `second`.
    ///
    /// Operators missing from the table never compare.
    #[must_use]
    pub fn binds_tighter_or_equal(&self, first: &Operator, second: &Operator) -> bool {
        match (self.precedence(first), self.precedence(second)) {
            (Some(a), Some(b)) => a <= b,
            _ => false,
        }
    }

    /// Returns true if `first` binds strictly more tightly than `second`.
    #[must_use]
    pub fn binds_tighter(&self, first: &Operator, second: &Operator) -> bool {
        match (self.precedence(first), self.precedence(second)) {
            (Some(a), Some(b)) => a < b,
            _ => false,
        }
    }

    /// Returns the prefix minus if `-` is configured.
    #[must_use]
    pub fn negation(&self) -> Option<Operator> {
        self.precedence
            .contains_key(&Operator::Negate)
            .then_some(Operator::Negate)
    }

    /// Returns every tier, tightest first, starting with the prefix-minus tier.
    #[must_use]
    pub fn tiers(&self) -> &[Vec<Operator>] {
        &self.tiers
    }
}

impl Default for OperatorTable {
    fn default() -> Self {
        Self::from_tiers(DEFAULT_TIERS.iter().map(|tier| tier.to_vec()).collect())
    }
}

fn classify(symbol: String, arity: Arity) -> Result<Operator, ConfigError> {
    match Operator::builtin(&symbol) {
        Some(builtin) if builtin.arity() == arity => Ok(builtin),
        Some(builtin) => Err(ConfigError::ArityMismatch {
            operator: symbol,
            expected: builtin.arity().into(),
            found: arity.into(),
        }),
        None if arity == Arity::Ternary => Err(ConfigError::UnsupportedArity {
            operator: symbol,
            arity: arity.into(),
        }),
        None => Ok(Operator::Custom { symbol, arity }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParserConfig;

    fn tier(entries: &[(&str, Arity)]) -> BTreeMap<String, Arity> {
        entries.iter().map(|(s, a)| ((*s).to_string(), *a)).collect()
    }

    #[test]
    fn test_default_matches_default_config() {
        let from_config = OperatorTable::new(&ParserConfig::default().operators).unwrap();
        let default = OperatorTable::default();
        assert_eq!(from_config.tiers().len(), default.tiers().len());
        for operator in default.tiers().iter().flatten() {
            assert_eq!(from_config.precedence(operator), default.precedence(operator));
        }
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let table = OperatorTable::default();
        assert_eq!(table.get("and"), Some(&Operator::And));
        assert_eq!(table.get("Like"), Some(&Operator::Like));
        assert_eq!(table.get("name"), None);
        assert_eq!(table.get("("), None);
    }

    #[test]
    fn test_precedence_order() {
        let table = OperatorTable::default();
        assert_eq!(table.precedence(&Operator::Negate), Some(0));
        assert_eq!(table.precedence(&Operator::Multiply), Some(1));
        assert_eq!(table.precedence(&Operator::Or), Some(8));
        assert!(table.binds_tighter_or_equal(&Operator::And, &Operator::Or));
        assert!(table.binds_tighter_or_equal(&Operator::Add, &Operator::Subtract));
        assert!(!table.binds_tighter_or_equal(&Operator::Or, &Operator::And));
        assert!(table.binds_tighter(&Operator::Equal, &Operator::Not));
        assert!(!table.binds_tighter(&Operator::Add, &Operator::Subtract));
    }

    #[test]
    fn test_negation_requires_minus() {
        assert_eq!(OperatorTable::default().negation(), Some(Operator::Negate));

        let table = OperatorTable::new(&[tier(&[("+", Arity::Binary)])]).unwrap();
        assert_eq!(table.negation(), None);
        assert!(table.tiers()[0].is_empty());
    }

    #[test]
    fn test_custom_operators() {
        let table = OperatorTable::new(&[tier(&[("<>", Arity::Binary), ("xor", Arity::Binary)])]).unwrap();
        assert_eq!(
            table.get("XOR"),
            Some(&Operator::Custom {
                symbol: "XOR".into(),
                arity: Arity::Binary
            })
        );
        assert_eq!(table.precedence(table.get("<>").unwrap()), Some(1));
    }

    #[test]
    fn test_rejects_builtin_with_wrong_arity() {
        let err = OperatorTable::new(&[tier(&[("NOT", Arity::Binary)])]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::ArityMismatch {
                expected: 1,
                found: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_ternary_custom() {
        let err = OperatorTable::new(&[tier(&[("FROM", Arity::Ternary)])]).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedArity { arity: 3, .. }));
    }

    #[test]
    fn test_rejects_duplicates_across_tiers() {
        let err = OperatorTable::new(&[tier(&[("AND", Arity::Binary)]), tier(&[("and", Arity::Binary)])])
            .unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateOperator(ref s) if s == "and"));
    }

    #[test]
    fn test_rejects_empty_symbol() {
        let err = OperatorTable::new(&[tier(&[("", Arity::Binary)])]).unwrap_err();
        assert!(matches!(err, ConfigError::EmptySymbol));
    }
}
