// SPDX-License-Identifier: MIT

//! Page rules and their actions

use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::flow::condition::Condition;

/// The conditional program bound to a page, run when the user leaves it
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Rule {
    #[serde(rename = "pageId", alias = "stepId")]
    pub page_id: String,
    #[serde(default)]
    pub actions: Vec<Action>,
}

/// One conditional effect within a rule
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Action {
    #[serde(rename = "type", default)]
    pub kind: ActionKind,
    #[serde(default)]
    pub condition: Condition,
    #[serde(default)]
    pub details: ActionDetails,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Jump,
    Hide,
    Add,
    Subtract,
    Multiply,
    Divide,
    Set,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Action parameters. Entries that fail to parse are dropped rather than
/// rejecting the whole document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ActionDetails {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub to: Option<Reference>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub target: Option<Reference>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub value: Option<ActionValue>,
}

/// A reference to a page, block or variable
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Reference {
    #[serde(rename = "type")]
    pub kind: ReferenceKind,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceKind {
    Page,
    Block,
    Variable,
    #[serde(other)]
    Unknown,
}

/// Right-hand operand of an arithmetic action
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum ActionValue {
    Constant(Value),
    Variable(String),
}

impl Action {
    /// An action with an `always` condition
    pub fn new(kind: ActionKind, details: ActionDetails) -> Self {
        Self {
            kind,
            condition: Condition::Always,
            details,
        }
    }

    pub fn when(mut self, condition: Condition) -> Self {
        self.condition = condition;
        self
    }

    /// Page id this action jumps to, if it is a well-formed jump
    pub fn jump_target(&self) -> Option<&str> {
        match (&self.kind, &self.details.to) {
            (
                ActionKind::Jump,
                Some(Reference {
                    kind: ReferenceKind::Page,
                    value,
                }),
            ) => Some(value.as_str()),
            _ => None,
        }
    }
}

impl Reference {
    pub fn page(id: impl Into<String>) -> Self {
        Self {
            kind: ReferenceKind::Page,
            value: id.into(),
        }
    }

    pub fn block(id: impl Into<String>) -> Self {
        Self {
            kind: ReferenceKind::Block,
            value: id.into(),
        }
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Self {
            kind: ReferenceKind::Variable,
            value: name.into(),
        }
    }
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.and_then(|v| serde_json::from_value(v).ok()))
}
