// SPDX-License-Identifier: MIT

//! Condition tree and its tolerant JSON mapping

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Value};

/// A boolean expression over answers, variables and constants
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// `always`
    Always,
    /// `and`: every child holds
    All(Vec<Condition>),
    /// `or`: at least one child holds
    Any(Vec<Condition>),
    /// Two-operand comparison
    Compare {
        op: CompareOp,
        left: Operand,
        right: Operand,
    },
    /// Unknown operator or broken shape. Evaluates to false; the raw JSON
    /// is kept so the document serializes back unchanged.
    Malformed(Value),
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Lt,
    Lte,
    Gt,
    Gte,
    Eq,
    Neq,
}

/// One side of a comparison
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Operand {
    /// The answer recorded for a block id
    Block(String),
    /// A runtime variable by name
    Variable(String),
    /// A literal
    Constant(Value),
}

impl CompareOp {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "lt" => Some(CompareOp::Lt),
            "lte" => Some(CompareOp::Lte),
            "gt" => Some(CompareOp::Gt),
            "gte" => Some(CompareOp::Gte),
            "eq" => Some(CompareOp::Eq),
            "neq" => Some(CompareOp::Neq),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CompareOp::Lt => "lt",
            CompareOp::Lte => "lte",
            CompareOp::Gt => "gt",
            CompareOp::Gte => "gte",
            CompareOp::Eq => "eq",
            CompareOp::Neq => "neq",
        }
    }
}

impl std::fmt::Display for CompareOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Default for Condition {
    fn default() -> Self {
        Condition::Malformed(Value::Null)
    }
}

impl Condition {
    /// Build a condition from authored JSON. Never fails: anything that does
    /// not fit the grammar becomes [`Condition::Malformed`].
    pub fn from_json(raw: &Value) -> Self {
        let Some(op) = raw.get("op").and_then(Value::as_str) else {
            return Condition::Malformed(raw.clone());
        };
        let vars = raw
            .get("vars")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        match op {
            "always" => Condition::Always,
            "and" => Condition::All(vars.iter().map(Condition::from_json).collect()),
            "or" => Condition::Any(vars.iter().map(Condition::from_json).collect()),
            other => {
                let Some(op) = CompareOp::from_name(other) else {
                    return Condition::Malformed(raw.clone());
                };
                // Only the first two operands are read
                let operands: Option<Vec<Operand>> = vars
                    .iter()
                    .take(2)
                    .map(|v| serde_json::from_value(v.clone()).ok())
                    .collect();
                match operands.as_deref() {
                    Some([left, right]) => Condition::Compare {
                        op,
                        left: left.clone(),
                        right: right.clone(),
                    },
                    _ => Condition::Malformed(raw.clone()),
                }
            }
        }
    }

    /// Authored JSON form
    pub fn to_json(&self) -> Value {
        match self {
            Condition::Always => json!({"op": "always", "vars": []}),
            Condition::All(children) => json!({
                "op": "and",
                "vars": children.iter().map(Condition::to_json).collect::<Vec<_>>(),
            }),
            Condition::Any(children) => json!({
                "op": "or",
                "vars": children.iter().map(Condition::to_json).collect::<Vec<_>>(),
            }),
            Condition::Compare { op, left, right } => json!({
                "op": op.name(),
                "vars": [left, right],
            }),
            Condition::Malformed(raw) => raw.clone(),
        }
    }

    /// True when this node or any descendant is malformed
    pub fn is_malformed(&self) -> bool {
        match self {
            Condition::Malformed(_) => true,
            Condition::All(children) | Condition::Any(children) => {
                children.iter().any(Condition::is_malformed)
            }
            Condition::Always | Condition::Compare { .. } => false,
        }
    }
}

impl<'de> Deserialize<'de> for Condition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Ok(Condition::from_json(&raw))
    }
}

impl Serialize for Condition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_op_display() {
        assert_eq!(format!("{}", CompareOp::Eq), "eq");
        assert_eq!(format!("{}", CompareOp::Neq), "neq");
        assert_eq!(format!("{}", CompareOp::Gte), "gte");
    }

    #[test]
    fn test_parse_comparison() {
        let cond = Condition::from_json(&json!({
            "op": "eq",
            "vars": [{"type": "block", "value": "q1"}, {"type": "constant", "value": "skip"}]
        }));
        assert_eq!(
            cond,
            Condition::Compare {
                op: CompareOp::Eq,
                left: Operand::Block("q1".to_string()),
                right: Operand::Constant(json!("skip")),
            }
        );
    }

    #[test]
    fn test_parse_always_without_vars() {
        assert_eq!(Condition::from_json(&json!({"op": "always"})), Condition::Always);
    }

    #[test]
    fn test_parse_nested_logical() {
        let cond = Condition::from_json(&json!({
            "op": "or",
            "vars": [
                {"op": "always"},
                {"op": "and", "vars": []}
            ]
        }));
        assert_eq!(
            cond,
            Condition::Any(vec![Condition::Always, Condition::All(vec![])])
        );
    }

    #[test]
    fn test_extra_operands_are_dropped() {
        let cond = Condition::from_json(&json!({
            "op": "gt",
            "vars": [
                {"type": "variable", "value": "score"},
                {"type": "constant", "value": 3},
                {"type": "constant", "value": 99}
            ]
        }));
        assert!(matches!(cond, Condition::Compare { op: CompareOp::Gt, .. }));
    }

    #[test]
    fn test_single_operand_is_malformed() {
        let raw = json!({"op": "eq", "vars": [{"type": "block", "value": "q1"}]});
        assert_eq!(Condition::from_json(&raw), Condition::Malformed(raw));
    }

    #[test]
    fn test_unknown_operator_is_malformed() {
        let raw = json!({"op": "contains", "vars": []});
        assert!(Condition::from_json(&raw).is_malformed());
    }

    #[test]
    fn test_malformed_child_is_reported() {
        let cond = Condition::from_json(&json!({"op": "and", "vars": [42]}));
        assert!(cond.is_malformed());
    }

    #[test]
    fn test_serialize_keeps_authored_shape() {
        let raw = json!({
            "op": "lt",
            "vars": [{"type": "variable", "value": "score"}, {"type": "constant", "value": 10}]
        });
        let cond: Condition = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(serde_json::to_value(&cond).unwrap(), raw);
    }
}
