// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::kit::error::Result;

/// One answered block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub block_id: String,
    pub value: Value,
}

/// Answers produced by one completed page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub document_id: String,
    pub session_id: Uuid,
    pub answers: Vec<Answer>,
    pub submitted_at: DateTime<Utc>,
}

/// Destination for submitted answers.
///
/// Delivery is at-least-once and unordered: implementations must tolerate
/// duplicate and partial submissions for the same session.
#[async_trait]
pub trait SubmissionSink: Send + Sync {
    /// Short name used in logs and errors
    fn name(&self) -> &str;

    /// Deliver one submission
    async fn submit(&self, submission: &Submission) -> Result<()>;
}
