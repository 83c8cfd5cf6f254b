// SPDX-License-Identifier: MIT

//! Document model: pages, blocks, rules and default variables
//!
//! A document is authored elsewhere and handed to the runtime as an
//! immutable snapshot. Forms, funnels and quizzes share one shape; the
//! `steps`/`stepId` spelling used by some entities is accepted as an alias.

mod block;
mod rule;

pub use block::{Block, BlockKind, Validation, Validations};
pub use rule::{Action, ActionDetails, ActionKind, ActionValue, Reference, ReferenceKind, Rule};

use crate::flow::state::Variables;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The entity a document belongs to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Form,
    #[default]
    Funnel,
    Quiz,
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKind::Form => write!(f, "form"),
            DocumentKind::Funnel => write!(f, "funnel"),
            DocumentKind::Quiz => write!(f, "quiz"),
        }
    }
}

/// Top-level document: ordered pages plus their rules
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Document {
    #[serde(default)]
    pub id: String,
    #[serde(default, alias = "doctype")]
    pub kind: DocumentKind,
    #[serde(alias = "steps")]
    pub pages: Vec<Page>,
    #[serde(default)]
    pub rules: Vec<Rule>,
    /// Defaults seeding every session's variables
    #[serde(default)]
    pub variables: Variables,
}

/// An ordered step in the wizard
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Page {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub blocks: Vec<Block>,
    #[serde(default)]
    pub properties: PageProperties,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageProperties {
    #[serde(default = "default_button_text")]
    pub button_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
}

fn default_button_text() -> String {
    "Continue".to_string()
}

impl Default for PageProperties {
    fn default() -> Self {
        Self {
            button_text: default_button_text(),
            redirect_url: None,
        }
    }
}

impl Page {
    /// Redirect target, ignoring blank values
    pub fn redirect_url(&self) -> Option<&str> {
        self.properties
            .redirect_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

impl Document {
    /// Number of pages
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Position of a page id in the sequence
    pub fn page_index(&self, id: &str) -> Option<usize> {
        self.pages.iter().position(|p| p.id == id)
    }

    /// The rule bound to a page. Only the first is honoured when several
    /// claim the same page.
    pub fn rule_for(&self, page_id: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.page_id == page_id)
    }

    /// Find a block anywhere in the document
    pub fn block(&self, id: &str) -> Option<&Block> {
        self.pages
            .iter()
            .flat_map(|p| p.blocks.iter())
            .find(|b| b.id == id)
    }

    /// Local cache key for a session's values
    pub fn cache_key(&self) -> String {
        format!("{}-{}-values", self.kind, self.id)
    }
}
