// SPDX-License-Identifier: MIT

//! Field validation for the visible blocks of a page

use regex::Regex;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::flow::document::{Block, Validation};
use crate::flow::state::Values;
use crate::flow::value::{as_number, format_number, is_truthy, to_text};

/// Validation messages keyed by block id
pub type ErrorMap = BTreeMap<String, String>;

/// Validate the given blocks. Returns `None` when every block passes.
///
/// Only the first failing validation of each block is reported.
pub fn validate(blocks: &[Block], values: &Values) -> Option<ErrorMap> {
    let errors: ErrorMap = blocks
        .iter()
        .filter_map(|block| {
            let value = values.get(&block.id);
            block
                .validations
                .iter()
                .find_map(|validation| check(validation, value))
                .map(|message| (block.id.clone(), message))
        })
        .collect();

    if errors.is_empty() {
        None
    } else {
        Some(errors)
    }
}

/// Run one validation; `Some(message)` on failure
fn check(validation: &Validation, value: Option<&Value>) -> Option<String> {
    match validation {
        Validation::Required => is_blank(value).then(|| "This field is required".to_string()),
        Validation::MinLength(min) => (is_truthy(value) && text_len(value) < *min)
            .then(|| format!("Must be at least {} characters", min)),
        Validation::MaxLength(max) => (is_truthy(value) && text_len(value) > *max)
            .then(|| format!("Must be at most {} characters", max)),
        Validation::MinChoices(min) => (choice_count(value) < *min)
            .then(|| format!("Select at least {} {}", min, plural(*min, "option"))),
        Validation::MaxChoices(max) => (choice_count(value) > *max)
            .then(|| format!("Select at most {} {}", max, plural(*max, "option"))),
        Validation::Min(min) => numeric(value)
            .filter(|n| n < min)
            .map(|_| format!("Must be at least {}", format_number(*min))),
        Validation::Max(max) => numeric(value)
            .filter(|n| n > max)
            .map(|_| format!("Must be at most {}", format_number(*max))),
        Validation::Pattern(pattern) => {
            if !is_truthy(value) {
                return None;
            }
            match Regex::new(pattern) {
                Ok(re) => (!re.is_match(&text(value))).then(|| "Invalid format".to_string()),
                Err(e) => {
                    log::warn!("Skipping invalid pattern '{}': {}", pattern, e);
                    None
                }
            }
        }
    }
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}

fn text(value: Option<&Value>) -> String {
    value.map(to_text).unwrap_or_default()
}

fn text_len(value: Option<&Value>) -> usize {
    text(value).chars().count()
}

fn choice_count(value: Option<&Value>) -> usize {
    match value {
        Some(Value::Array(items)) => items.len(),
        other if is_truthy(other) => 1,
        _ => 0,
    }
}

/// Numeric reading for bounds; missing/null and non-numeric values are skipped
fn numeric(value: Option<&Value>) -> Option<f64> {
    match value {
        None | Some(Value::Null) => None,
        Some(v) => as_number(v),
    }
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        word.to_string()
    } else {
        format!("{}s", word)
    }
}
