//! Tests for evaluating parsed clauses.

mod common;
use common::*;
use serde_json::{Value, json};
use sql_where_core::{Operator, WhereParser, default_evaluator};

/// Maps a tree to a document-store filter.
fn mongo(operator: &Operator, operands: Vec<Value>) -> Value {
    let mut operands = operands.into_iter();
    let mut next = || operands.next().unwrap_or(Value::Null);
    match operator {
        Operator::And => json!({ "$and": [next(), next()] }),
        Operator::Or => json!({ "$or": [next(), next()] }),
        Operator::Not => json!({ "$nor": [next()] }),
        Operator::Equal => {
            let field = next().as_str().unwrap().to_string();
            json!({ field: next() })
        }
        Operator::GreaterOrEqual => {
            let field = next().as_str().unwrap().to_string();
            json!({ field: { "$gte": next() } })
        }
        Operator::In => {
            let field = next().as_str().unwrap().to_string();
            json!({ field: { "$in": next() } })
        }
        Operator::Between => {
            let field = next().as_str().unwrap().to_string();
            json!({ field: { "$gte": next(), "$lte": next() } })
        }
        other => panic!("unsupported operator {other}"),
    }
}

#[test]
fn mongo_filter() {
    let parser = WhereParser::new();
    let filter = parser
        .parse_with(r#"name = "Shaun Persad" AND age >= 27"#, mongo)
        .unwrap();
    assert_eq!(
        filter,
        json!({ "$and": [{ "name": "Shaun Persad" }, { "age": { "$gte": 27 } }] })
    );
}

#[test]
fn mongo_filter_with_lists_and_ranges() {
    let parser = WhereParser::new();
    let sql = "city IN (NY, LA) OR NOT (age BETWEEN 18 AND 65)";
    let filter = parser.parse_with(sql, mongo).unwrap();
    assert_eq!(
        filter,
        json!({
            "$or": [
                { "city": { "$in": ["NY", "LA"] } },
                { "$nor": [{ "age": { "$gte": 18, "$lte": 65 } }] }
            ]
        })
    );
    // Folding the tree afterwards gives the same filter.
    let tree = parser.parse(sql).unwrap().expression_tree;
    assert_eq!(tree.evaluate(&mut mongo), filter);
}

#[test]
fn inline_arithmetic() {
    let parser = WhereParser::new();
    let parsed = parser
        .parse_with(r#"name = "Shaun Persad" AND age >= (20 + 7)"#, |operator, operands| {
            if *operator == Operator::Add {
                json!(operands[0].as_i64().unwrap() + operands[1].as_i64().unwrap())
            } else {
                default_evaluator(operator, operands)
            }
        })
        .unwrap();
    assert_eq!(
        parsed,
        json!({ "AND": [{ "=": ["name", "Shaun Persad"] }, { ">=": ["age", 27] }] })
    );
}

#[test]
fn evaluator_sees_operations_innermost_first() {
    let parser = WhereParser::new();
    let mut order = Vec::new();
    parser
        .parse_with("a = 1 OR b = 2 AND NOT c", |operator, operands| {
            order.push(operator.to_string());
            default_evaluator(operator, operands)
        })
        .unwrap();
    assert_eq!(order, vec!["=", "=", "NOT", "AND", "OR"]);
}

#[test]
fn strategies_agree() {
    let inputs = [
        "a",
        "a = b",
        "a = b OR c AND d",
        "NOT a = b AND NOT c",
        "-1 + -(5 - - 5)",
        "1 * 2 + 3 * 4 - -5 % 2",
        "A BETWEEN 1 AND 2 AND x = y",
        "A BETWEEN -1 + 2 AND (3) OR B",
        "city IN (A, B) AND name LIKE 'x%'",
        "x IN ((1, 2), 3)",
        "a, b, (c, d)",
        "deleted IS null OR (NOT (active = true))",
        "(((x)))",
        "",
    ];
    for sql in inputs {
        // `tree_json` compares the folded result with the tree.
        let _ = tree_json(sql);
    }
}
