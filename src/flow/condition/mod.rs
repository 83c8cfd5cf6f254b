// SPDX-License-Identifier: MIT

//! Condition evaluation for page rules
//!
//! Conditions are authored as JSON trees:
//! - `{"op": "always"}`
//! - `{"op": "eq", "vars": [{"type": "block", "value": "q1"}, {"type": "constant", "value": "yes"}]}`
//! - `{"op": "and", "vars": [<condition>, <condition>]}`

mod ast;
mod evaluator;

pub use ast::{CompareOp, Condition, Operand};
pub use evaluator::evaluate;
