// SPDX-License-Identifier: MIT

//! Per-session state: answered values and runtime variables
//!
//! - `Values` - the user's answers keyed by block id
//! - `Variables` - numeric/string state mutated by rule actions

mod variables;

pub use variables::{VarValue, Variables};

/// Answers keyed by block id
pub type Values = std::collections::HashMap<String, serde_json::Value>;
