// SPDX-License-Identifier: MIT

//! Typed error handling for stepflow-rs
//!
//! Evaluation itself never fails: malformed documents degrade to no-ops.
//! These errors cover loading, configuration, and collaborator I/O.

use thiserror::Error;

/// Top-level error type for stepflow-rs
#[derive(Debug, Error)]
pub enum StepflowError {
    /// Configuration errors (invalid env vars, bad endpoints)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Document integrity errors
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    /// Local value cache failures
    #[error("Value store error: {0}")]
    Store(String),

    /// Submission sink rejected or failed to deliver answers
    #[error("Submission to {sink} failed: {message}")]
    Submission { sink: String, message: String },

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// Generic error wrapper
    #[error("{0}")]
    Other(String),
}

/// Integrity defects in an authored document
///
/// The runtime tolerates every one of these; they are reported by
/// [`crate::flow::check`] so authors can fix them.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DocumentError {
    #[error("Document has no pages")]
    Empty,

    #[error("Duplicate page id: {0}")]
    DuplicatePage(String),

    #[error("Block id '{block}' is used more than once (again on page '{page}')")]
    DuplicateBlock { block: String, page: String },

    #[error("Rule references unknown page '{0}'")]
    DanglingRule(String),

    #[error("More than one rule is bound to page '{0}'")]
    DuplicateRule(String),

    #[error("Rule for page '{page}' jumps to unknown page '{target}'")]
    UnknownJumpTarget { page: String, target: String },

    #[error("Rule for page '{page}' has a malformed condition on action {action}")]
    MalformedCondition { page: String, action: usize },

    #[error("Block '{block}' has an invalid pattern: {message}")]
    InvalidPattern { block: String, message: String },

    #[error("Page '{page}' has an invalid redirect URL '{url}'")]
    InvalidRedirect { page: String, url: String },

    #[error("Block '{block}' takes no input but declares validations")]
    ValidationsWithoutInput { block: String },

    #[error("Rule for page '{page}' hides unknown block '{block}'")]
    UnknownHideTarget { page: String, block: String },
}

impl StepflowError {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a value store error
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store(message.into())
    }

    /// Create a submission error
    pub fn submission(sink: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Submission {
            sink: sink.into(),
            message: message.into(),
        }
    }

    /// Create from a generic error
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}

impl From<&str> for StepflowError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

impl From<String> for StepflowError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

pub type Result<T> = std::result::Result<T, StepflowError>;
