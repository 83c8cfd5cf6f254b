// SPDX-License-Identifier: MIT

//! Condition evaluator

use super::ast::{CompareOp, Condition, Operand};
use crate::flow::state::{Values, Variables};
use crate::flow::value::{same_value, Scalar};
use serde_json::Value;
use std::borrow::Cow;
use std::cmp::Ordering;

/// Evaluate a condition against the answers and variables of a session
pub fn evaluate(condition: &Condition, values: &Values, variables: &Variables) -> bool {
    match condition {
        Condition::Always => true,
        Condition::All(children) => children.iter().all(|c| evaluate(c, values, variables)),
        Condition::Any(children) => children.iter().any(|c| evaluate(c, values, variables)),
        Condition::Compare { op, left, right } => {
            let left = resolve(left, values, variables);
            let right = resolve(right, values, variables);
            compare(*op, left.as_deref(), right.as_deref())
        }
        Condition::Malformed(_) => false,
    }
}

fn resolve<'a>(
    operand: &'a Operand,
    values: &'a Values,
    variables: &Variables,
) -> Option<Cow<'a, Value>> {
    match operand {
        Operand::Constant(value) => Some(Cow::Borrowed(value)),
        Operand::Block(id) => values.get(id).map(Cow::Borrowed),
        Operand::Variable(name) => variables.get(name).map(|v| Cow::Owned(v.to_json())),
    }
}

fn compare(op: CompareOp, left: Option<&Value>, right: Option<&Value>) -> bool {
    if matches!(op, CompareOp::Eq | CompareOp::Neq) {
        if let Some(contained) = membership(left, right) {
            return if op == CompareOp::Eq {
                contained
            } else {
                !contained
            };
        }
    }

    let left = Scalar::normalize(left);
    let right = Scalar::normalize(right);

    match op {
        CompareOp::Eq => left.loose_eq(&right),
        CompareOp::Neq => !left.loose_eq(&right),
        CompareOp::Lt => left.compare(&right) == Some(Ordering::Less),
        CompareOp::Lte => matches!(
            left.compare(&right),
            Some(Ordering::Less | Ordering::Equal)
        ),
        CompareOp::Gt => left.compare(&right) == Some(Ordering::Greater),
        CompareOp::Gte => matches!(
            left.compare(&right),
            Some(Ordering::Greater | Ordering::Equal)
        ),
    }
}

/// Array membership, checked in either position. `None` when neither side
/// is an array.
fn membership(left: Option<&Value>, right: Option<&Value>) -> Option<bool> {
    match (left, right) {
        (Some(Value::Array(items)), other) | (other, Some(Value::Array(items))) => {
            Some(match other {
                Some(needle) => items.iter().any(|item| same_value(item, needle)),
                None => false,
            })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::state::VarValue;
    use serde_json::json;

    fn cond(raw: Value) -> Condition {
        Condition::from_json(&raw)
    }

    fn block(id: &str) -> Value {
        json!({"type": "block", "value": id})
    }

    fn var(name: &str) -> Value {
        json!({"type": "variable", "value": name})
    }

    fn constant(value: Value) -> Value {
        json!({"type": "constant", "value": value})
    }

    fn values_with(pairs: Vec<(&str, Value)>) -> Values {
        pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
    }

    #[test]
    fn test_always() {
        assert!(evaluate(
            &cond(json!({"op": "always", "vars": []})),
            &Values::new(),
            &Variables::new()
        ));
    }

    #[test]
    fn test_string_equality() {
        let values = values_with(vec![("q1", json!("skip"))]);
        let c = cond(json!({"op": "eq", "vars": [block("q1"), constant(json!("skip"))]}));
        assert!(evaluate(&c, &values, &Variables::new()));

        let c = cond(json!({"op": "neq", "vars": [block("q1"), constant(json!("skip"))]}));
        assert!(!evaluate(&c, &values, &Variables::new()));
    }

    #[test]
    fn test_array_membership_either_side() {
        let c = cond(json!({
            "op": "eq",
            "vars": [constant(json!("a")), constant(json!(["a", "b"]))]
        }));
        assert!(evaluate(&c, &Values::new(), &Variables::new()));

        let values = values_with(vec![("colors", json!(["red", "blue"]))]);
        let c = cond(json!({"op": "eq", "vars": [block("colors"), constant(json!("blue"))]}));
        assert!(evaluate(&c, &values, &Variables::new()));

        let c = cond(json!({"op": "neq", "vars": [block("colors"), constant(json!("green"))]}));
        assert!(evaluate(&c, &values, &Variables::new()));
    }

    #[test]
    fn test_numeric_string_equals_number() {
        let values = values_with(vec![("age", json!("30"))]);
        let c = cond(json!({"op": "eq", "vars": [block("age"), constant(json!(30))]}));
        assert!(evaluate(&c, &values, &Variables::new()));
    }

    #[test]
    fn test_number_comparison() {
        let vars: Variables = [("score", VarValue::Number(7.5))].into_iter().collect();
        let values = Values::new();

        let gt = |n: f64| cond(json!({"op": "gt", "vars": [var("score"), constant(json!(n))]}));
        assert!(evaluate(&gt(5.0), &values, &vars));
        assert!(!evaluate(&gt(10.0), &values, &vars));

        let lte = cond(json!({"op": "lte", "vars": [var("score"), constant(json!(7.5))]}));
        assert!(evaluate(&lte, &values, &vars));

        let gte = cond(json!({"op": "gte", "vars": [var("score"), constant(json!(8))]}));
        assert!(!evaluate(&gte, &values, &vars));

        let lt = cond(json!({"op": "lt", "vars": [var("score"), constant(json!(10))]}));
        assert!(evaluate(&lt, &values, &vars));
    }

    #[test]
    fn test_numeric_not_lexicographic() {
        let values = values_with(vec![("n", json!("9"))]);
        let c = cond(json!({"op": "lt", "vars": [block("n"), constant(json!("10"))]}));
        assert!(evaluate(&c, &values, &Variables::new()));
    }

    #[test]
    fn test_text_is_lexicographic() {
        let c = cond(json!({
            "op": "lt",
            "vars": [constant(json!("apple")), constant(json!("banana"))]
        }));
        assert!(evaluate(&c, &Values::new(), &Variables::new()));
    }

    #[test]
    fn test_missing_block_is_empty_string() {
        let c = cond(json!({"op": "eq", "vars": [block("nope"), constant(json!(""))]}));
        assert!(evaluate(&c, &Values::new(), &Variables::new()));

        let c = cond(json!({"op": "eq", "vars": [block("nope"), constant(Value::Null)]}));
        assert!(evaluate(&c, &Values::new(), &Variables::new()));
    }

    #[test]
    fn test_missing_against_array_is_not_member() {
        let c = cond(json!({"op": "eq", "vars": [block("nope"), constant(json!(["a"]))]}));
        assert!(!evaluate(&c, &Values::new(), &Variables::new()));
    }

    #[test]
    fn test_and_or() {
        let values = values_with(vec![("q1", json!("yes")), ("q2", json!(4))]);
        let yes = json!({"op": "eq", "vars": [block("q1"), constant(json!("yes"))]});
        let big = json!({"op": "gt", "vars": [block("q2"), constant(json!(10))]});

        let and = cond(json!({"op": "and", "vars": [yes.clone(), big.clone()]}));
        assert!(!evaluate(&and, &values, &Variables::new()));

        let or = cond(json!({"op": "or", "vars": [yes, big]}));
        assert!(evaluate(&or, &values, &Variables::new()));
    }

    #[test]
    fn test_empty_logical_groups() {
        assert!(evaluate(
            &cond(json!({"op": "and", "vars": []})),
            &Values::new(),
            &Variables::new()
        ));
        assert!(!evaluate(
            &cond(json!({"op": "or", "vars": []})),
            &Values::new(),
            &Variables::new()
        ));
    }

    #[test]
    fn test_malformed_is_false() {
        let one_operand = cond(json!({"op": "eq", "vars": [constant(json!(""))]}));
        assert!(!evaluate(&one_operand, &Values::new(), &Variables::new()));

        let unknown = cond(json!({"op": "between", "vars": [constant(json!(1)), constant(json!(2))]}));
        assert!(!evaluate(&unknown, &Values::new(), &Variables::new()));
    }
}
