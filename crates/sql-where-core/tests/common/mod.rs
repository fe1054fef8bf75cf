#![allow(dead_code)]

use serde_json::Value;
use sql_where_core::{Parsed, SyntaxError, WhereParser, default_evaluator};

pub fn parse(sql: &str) -> Parsed {
    WhereParser::new()
        .parse(sql)
        .unwrap_or_else(|e| panic!("Failed to parse: {sql}\nError: {e:?}"))
}

pub fn parse_err(sql: &str) -> SyntaxError {
    WhereParser::new()
        .parse(sql)
        .expect_err(&format!("Expected parse error for: {sql}"))
}

/// Parses `sql` and returns its tree as `{ "<symbol>": [operands] }` JSON.
///
/// Also checks that folding through the evaluator gives the same result.
pub fn tree_json(sql: &str) -> Value {
    let tree = parse(sql).expression_tree.to_json();
    let folded = WhereParser::new()
        .parse_with(sql, default_evaluator)
        .unwrap_or_else(|e| panic!("Failed to fold: {sql}\nError: {e:?}"));
    assert_eq!(tree, folded, "Strategies disagree for: {sql}");
    tree
}

/// Returns the display form of `sql` as nested JSON arrays.
pub fn array_json(sql: &str) -> Value {
    let node = WhereParser::new()
        .to_array(sql)
        .unwrap_or_else(|e| panic!("Failed to group: {sql}\nError: {e:?}"));
    serde_json::to_value(node).unwrap()
}

/// Verifies that the rendered tree parses back to the same tree.
pub fn round_trip(sql: &str) {
    let tree1 = parse(sql).expression_tree;
    let rendered1 = tree1.to_string();
    let tree2 = parse(&rendered1).expression_tree;
    let rendered2 = tree2.to_string();
    assert_eq!(
        tree1, tree2,
        "Round-trip failed.\n  Input:    {sql}\n  First:    {rendered1}\n  Second:   {rendered2}"
    );
    assert_eq!(rendered1, rendered2);
}
