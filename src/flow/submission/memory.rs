// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::kit::error::{Result, StepflowError};
use crate::kit::sink::{Submission, SubmissionSink};

/// Records submissions in memory. Can be told to reject everything.
#[derive(Clone, Default)]
pub struct MemorySink {
    received: Arc<Mutex<Vec<Submission>>>,
    reject: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that fails every submission after recording it
    pub fn rejecting() -> Self {
        Self {
            reject: true,
            ..Self::default()
        }
    }

    /// Everything received so far
    pub async fn submissions(&self) -> Vec<Submission> {
        self.received.lock().await.clone()
    }
}

#[async_trait]
impl SubmissionSink for MemorySink {
    fn name(&self) -> &str {
        "memory"
    }

    async fn submit(&self, submission: &Submission) -> Result<()> {
        self.received.lock().await.push(submission.clone());
        if self.reject {
            return Err(StepflowError::submission(self.name(), "rejected"));
        }
        Ok(())
    }
}
