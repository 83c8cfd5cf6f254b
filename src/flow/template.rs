// SPDX-License-Identifier: MIT

//! Template resolution for block properties
//!
//! String properties may reference earlier answers and variables:
//! - `{{block:q1}}` - the answer to block `q1` (lists join with `, `)
//! - `{{var:score}}` - the current value of variable `score`
//!
//! Unknown references resolve to an empty string.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::{Map, Value};

use crate::flow::document::Block;
use crate::flow::state::{Values, Variables};
use crate::flow::value::{join, to_text};

static TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{\s*(var|block):\s*([^}]*?)\s*\}\}").expect("template token pattern")
});

/// Resolve every template token in the blocks' properties
pub fn resolve(blocks: &[Block], values: &Values, variables: &Variables) -> Vec<Block> {
    blocks
        .iter()
        .map(|block| Block {
            properties: resolve_map(&block.properties, values, variables),
            ..block.clone()
        })
        .collect()
}

/// Resolve tokens in a single string
pub fn resolve_str(text: &str, values: &Values, variables: &Variables) -> String {
    if !text.contains("{{") {
        return text.to_string();
    }
    TOKEN
        .replace_all(text, |caps: &Captures| match &caps[1] {
            "var" => variables
                .get(&caps[2])
                .map(ToString::to_string)
                .unwrap_or_default(),
            _ => values.get(&caps[2]).map(render_answer).unwrap_or_default(),
        })
        .into_owned()
}

fn resolve_map(map: &Map<String, Value>, values: &Values, variables: &Variables) -> Map<String, Value> {
    map.iter()
        .map(|(k, v)| (k.clone(), resolve_value(v, values, variables)))
        .collect()
}

fn resolve_value(value: &Value, values: &Values, variables: &Variables) -> Value {
    match value {
        Value::String(s) => Value::String(resolve_str(s, values, variables)),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| resolve_value(item, values, variables))
                .collect(),
        ),
        Value::Object(map) => Value::Object(resolve_map(map, values, variables)),
        other => other.clone(),
    }
}

fn render_answer(value: &Value) -> String {
    match value {
        Value::Array(items) => join(items, ", "),
        other => to_text(other),
    }
}
