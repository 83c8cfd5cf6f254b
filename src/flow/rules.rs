// SPDX-License-Identifier: MIT

//! Rule engine: runs a page's actions against the session state
//!
//! Actions run top to bottom. Arithmetic is applied to a working copy of the
//! variables, so later conditions in the same rule see earlier results.
//! Jump and hide effects are collected on the side and never feed back into
//! condition evaluation. When several jumps fire, the first one wins.

use serde_json::Value;
use std::collections::HashSet;

use crate::flow::condition::evaluate as evaluate_condition;
use crate::flow::document::{Action, ActionKind, ActionValue, ReferenceKind, Rule};
use crate::flow::state::{Values, Variables};
use crate::flow::value::as_number;

/// Result of running one rule
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleOutcome {
    /// First satisfied jump target, if any
    pub next_page_id: Option<String>,
    /// Blocks to hide on the next page
    pub hidden_block_ids: HashSet<String>,
    /// Variables after every satisfied arithmetic action
    pub variables: Variables,
}

/// Evaluate a rule
pub fn evaluate(rule: &Rule, values: &Values, variables: &Variables) -> RuleOutcome {
    let mut outcome = RuleOutcome {
        variables: variables.clone(),
        ..Default::default()
    };

    for (index, action) in rule.actions.iter().enumerate() {
        if !evaluate_condition(&action.condition, values, &outcome.variables) {
            continue;
        }
        log::debug!(
            "Rule for page {}: action {} ({:?}) fired",
            rule.page_id,
            index,
            action.kind
        );
        apply(action, &mut outcome);
    }

    outcome
}

fn apply(action: &Action, outcome: &mut RuleOutcome) {
    match action.kind {
        ActionKind::Jump => {
            if outcome.next_page_id.is_none() {
                if let Some(target) = action.jump_target() {
                    outcome.next_page_id = Some(target.to_string());
                }
            }
        }
        ActionKind::Hide => {
            if let Some(target) = &action.details.target {
                if target.kind == ReferenceKind::Block {
                    outcome.hidden_block_ids.insert(target.value.clone());
                }
            }
        }
        ActionKind::Add
        | ActionKind::Subtract
        | ActionKind::Multiply
        | ActionKind::Divide
        | ActionKind::Set => apply_arithmetic(action, &mut outcome.variables),
        ActionKind::Unknown => {}
    }
}

fn apply_arithmetic(action: &Action, variables: &mut Variables) {
    let (Some(target), Some(operand)) = (&action.details.target, &action.details.value) else {
        return;
    };
    if target.kind != ReferenceKind::Variable {
        return;
    }

    let current = variables.number(&target.value);
    let operand = match operand {
        ActionValue::Constant(value) => constant_number(value),
        ActionValue::Variable(name) => variables.number(name),
    };

    let result = match action.kind {
        ActionKind::Add => current + operand,
        ActionKind::Subtract => current - operand,
        ActionKind::Multiply => current * operand,
        ActionKind::Divide if operand == 0.0 => current,
        ActionKind::Divide => current / operand,
        ActionKind::Set => operand,
        ActionKind::Jump | ActionKind::Hide | ActionKind::Unknown => return,
    };
    variables.set(&target.value, result);
}

fn constant_number(value: &Value) -> f64 {
    as_number(value).unwrap_or(0.0)
}
