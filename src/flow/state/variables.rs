// SPDX-License-Identifier: MIT

//! Runtime variable storage

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

use crate::flow::value::{format_number, parse_number};

/// A single variable value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VarValue {
    Number(f64),
    Text(String),
}

impl VarValue {
    /// Numeric reading; numeric text counts, anything else is `None`
    pub fn as_number(&self) -> Option<f64> {
        match self {
            VarValue::Number(n) => Some(*n),
            VarValue::Text(s) => parse_number(s),
        }
    }

    /// JSON form, used when a variable is an operand in a comparison
    pub fn to_json(&self) -> Value {
        match self {
            VarValue::Number(n) => serde_json::Number::from_f64(*n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            VarValue::Text(s) => Value::String(s.clone()),
        }
    }
}

impl fmt::Display for VarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VarValue::Number(n) => write!(f, "{}", format_number(*n)),
            VarValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<f64> for VarValue {
    fn from(n: f64) -> Self {
        VarValue::Number(n)
    }
}

impl From<&str> for VarValue {
    fn from(s: &str) -> Self {
        VarValue::Text(s.to_string())
    }
}

/// Named variables for one session, seeded from the document defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Variables {
    fields: HashMap<String, VarValue>,
}

impl Variables {
    /// Create an empty variable set
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a variable value
    pub fn get(&self, name: &str) -> Option<&VarValue> {
        self.fields.get(name)
    }

    /// Numeric value of a variable, 0 when absent or non-numeric
    pub fn number(&self, name: &str) -> f64 {
        self.fields
            .get(name)
            .and_then(VarValue::as_number)
            .unwrap_or(0.0)
    }

    /// Overwrite a variable
    pub fn set(&mut self, name: &str, value: impl Into<VarValue>) {
        self.fields.insert(name.to_string(), value.into());
    }

    /// Convert variables to a JSON object
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.fields
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }

    /// Iterate over all variables
    pub fn iter(&self) -> impl Iterator<Item = (&String, &VarValue)> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<VarValue>> FromIterator<(K, V)> for Variables {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_variables() {
        let vars = Variables::new();
        assert!(vars.get("anything").is_none());
        assert_eq!(vars.number("anything"), 0.0);
    }

    #[test]
    fn test_number_reads_numeric_text() {
        let vars: Variables = [("a", VarValue::from("12")), ("b", VarValue::from("x"))]
            .into_iter()
            .collect();
        assert_eq!(vars.number("a"), 12.0);
        assert_eq!(vars.number("b"), 0.0);
    }

    #[test]
    fn test_deserialize_mixed_defaults() {
        let vars: Variables = serde_json::from_value(json!({"score": 0, "tier": "gold"})).unwrap();
        assert_eq!(vars.get("score"), Some(&VarValue::Number(0.0)));
        assert_eq!(vars.get("tier"), Some(&VarValue::Text("gold".to_string())));
    }

    #[test]
    fn test_overwrite() {
        let mut vars = Variables::new();
        vars.set("score", 1.0);
        vars.set("score", 2.0);
        assert_eq!(vars.number("score"), 2.0);
        assert_eq!(vars.len(), 1);
    }

    #[test]
    fn test_display() {
        assert_eq!(VarValue::Number(10.0).to_string(), "10");
        assert_eq!(VarValue::from("hi").to_string(), "hi");
    }

    #[test]
    fn test_to_json() {
        let mut vars = Variables::new();
        vars.set("a", 1.0);
        vars.set("b", "hello");
        let json = vars.to_json();
        assert_eq!(json["a"], 1.0);
        assert_eq!(json["b"], "hello");
    }
}
