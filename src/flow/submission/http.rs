// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

use crate::kit::error::{Result, StepflowError};
use crate::kit::sink::{Submission, SubmissionSink};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// POSTs each submission as JSON to a fixed endpoint
pub struct HttpSubmissionSink {
    client: Client,
    endpoint: Url,
    token: Option<String>,
}

impl HttpSubmissionSink {
    pub fn new(endpoint: Url, token: Option<String>) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            endpoint,
            token,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl SubmissionSink for HttpSubmissionSink {
    fn name(&self) -> &str {
        "http"
    }

    async fn submit(&self, submission: &Submission) -> Result<()> {
        let mut request = self
            .client
            .post(self.endpoint.clone())
            .header("Accept", "application/json")
            .json(submission);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let resp = request.send().await?;
        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(StepflowError::submission(
                self.name(),
                format!("{} {}", status, text),
            ));
        }

        log::debug!(
            "Submitted {} answers for session {}",
            submission.answers.len(),
            submission.session_id
        );
        Ok(())
    }
}
