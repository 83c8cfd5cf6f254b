// SPDX-License-Identifier: MIT

//! Loose value coercions shared by the evaluator, validator, and templates
//!
//! Answers arrive as arbitrary JSON. These helpers give them one consistent
//! reading: `null` and missing are empty, arrays flatten to joined text, and
//! numeric-looking strings compare as numbers.

use serde_json::Value;
use std::cmp::Ordering;

/// A value reduced to the two shapes comparisons understand
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Number(f64),
    Text(String),
}

impl Scalar {
    /// Normalize an optional JSON value for comparison
    pub fn normalize(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => Scalar::Text(String::new()),
            Some(Value::Number(n)) => n
                .as_f64()
                .map(Scalar::Number)
                .unwrap_or_else(|| Scalar::Text(n.to_string())),
            Some(Value::Array(items)) => Scalar::Text(join(items, ",")),
            Some(other) => {
                let text = to_text(other);
                match parse_number(&text) {
                    Some(n) => Scalar::Number(n),
                    None => Scalar::Text(text),
                }
            }
        }
    }

    /// Strict equality: a number never equals text
    pub fn loose_eq(&self, other: &Scalar) -> bool {
        match (self, other) {
            (Scalar::Number(a), Scalar::Number(b)) => a == b,
            (Scalar::Text(a), Scalar::Text(b)) => a == b,
            _ => false,
        }
    }

    /// Numeric ordering when both sides are numbers, lexicographic otherwise
    pub fn compare(&self, other: &Scalar) -> Option<Ordering> {
        match (self, other) {
            (Scalar::Number(a), Scalar::Number(b)) => a.partial_cmp(b),
            _ => Some(self.as_text().cmp(&other.as_text())),
        }
    }

    fn as_text(&self) -> String {
        match self {
            Scalar::Number(n) => format_number(*n),
            Scalar::Text(s) => s.clone(),
        }
    }
}

/// Parse a trimmed, non-empty string as a finite number
pub fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Read a JSON value as a number, accepting numeric strings
pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_number(s),
        _ => None,
    }
}

/// Render a number without a trailing `.0` for whole values
pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// String form of a value; arrays join with `,`, null is empty
pub fn to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.as_f64().map(format_number).unwrap_or_else(|| n.to_string()),
        Value::Bool(b) => b.to_string(),
        Value::Array(items) => join(items, ","),
        Value::Object(_) => value.to_string(),
    }
}

/// Join array items by their string form
pub fn join(items: &[Value], separator: &str) -> String {
    items.iter().map(to_text).collect::<Vec<_>>().join(separator)
}

/// Falsy values: missing, null, false, 0, NaN and the empty string
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// Strict element equality used for array membership
pub fn same_value(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}
