// SPDX-License-Identifier: MIT

//! Runtime configuration from environment variables
//!
//! - `STEPFLOW_STORE_DIR` - directory for cached answers (default: in memory)
//! - `STEPFLOW_SUBMIT_URL` - HTTP endpoint receiving submissions (default: none)
//! - `STEPFLOW_SUBMIT_TOKEN` - bearer token for the submission endpoint
//! - `STEPFLOW_DEBOUNCE_MS` - cache write debounce window (default: 300)

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::flow::store::{FileValueStore, MemoryValueStore};
use crate::flow::submission::HttpSubmissionSink;
use crate::kit::error::{Result, StepflowError};
use crate::kit::sink::SubmissionSink;
use crate::kit::store::ValueStore;

const DEFAULT_DEBOUNCE_MS: u64 = 300;

#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeConfig {
    pub store_dir: Option<PathBuf>,
    pub submit_url: Option<Url>,
    pub submit_token: Option<String>,
    pub debounce: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            store_dir: None,
            submit_url: None,
            submit_token: None,
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
        }
    }
}

impl RuntimeConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(dir) = get("STEPFLOW_STORE_DIR") {
            config.store_dir = Some(PathBuf::from(dir));
        }
        if let Some(url) = get("STEPFLOW_SUBMIT_URL") {
            config = config.with_submit_url(&url)?;
        }
        config.submit_token = get("STEPFLOW_SUBMIT_TOKEN");
        if let Some(ms) = get("STEPFLOW_DEBOUNCE_MS") {
            let ms: u64 = ms.trim().parse().map_err(|_| {
                StepflowError::config(format!("STEPFLOW_DEBOUNCE_MS must be an integer, got '{}'", ms))
            })?;
            config.debounce = Duration::from_millis(ms);
        }

        Ok(config)
    }

    /// Set the submission endpoint; only absolute http(s) URLs are accepted
    pub fn with_submit_url(mut self, url: &str) -> Result<Self> {
        let parsed = Url::parse(url)
            .map_err(|e| StepflowError::config(format!("Invalid submit URL '{}': {}", url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(StepflowError::config(format!(
                "Submit URL must use http or https, got '{}'",
                parsed.scheme()
            )));
        }
        self.submit_url = Some(parsed);
        Ok(self)
    }

    /// The configured value store
    pub fn value_store(&self) -> Arc<dyn ValueStore> {
        match &self.store_dir {
            Some(dir) => Arc::new(FileValueStore::new(dir.clone())),
            None => Arc::new(MemoryValueStore::new()),
        }
    }

    /// The configured submission sink, if any
    pub fn submission_sink(&self) -> Result<Option<Arc<dyn SubmissionSink>>> {
        let Some(url) = &self.submit_url else {
            return Ok(None);
        };
        let sink = HttpSubmissionSink::new(url.clone(), self.submit_token.clone())?;
        Ok(Some(Arc::new(sink)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = RuntimeConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, RuntimeConfig::default());
        assert_eq!(config.debounce, Duration::from_millis(300));
        assert!(config.submission_sink().unwrap().is_none());
    }

    #[test]
    fn test_reads_all_keys() {
        let config = RuntimeConfig::from_lookup(lookup(&[
            ("STEPFLOW_STORE_DIR", "/tmp/stepflow"),
            ("STEPFLOW_SUBMIT_URL", "https://hooks.example.com/answers"),
            ("STEPFLOW_SUBMIT_TOKEN", "secret"),
            ("STEPFLOW_DEBOUNCE_MS", "50"),
        ]))
        .unwrap();
        assert_eq!(config.store_dir, Some(PathBuf::from("/tmp/stepflow")));
        assert_eq!(
            config.submit_url.as_ref().map(Url::as_str),
            Some("https://hooks.example.com/answers")
        );
        assert_eq!(config.submit_token.as_deref(), Some("secret"));
        assert_eq!(config.debounce, Duration::from_millis(50));
    }

    #[test]
    fn test_blank_values_are_unset() {
        let config = RuntimeConfig::from_lookup(lookup(&[("STEPFLOW_SUBMIT_URL", "  ")])).unwrap();
        assert!(config.submit_url.is_none());
    }

    #[test]
    fn test_invalid_debounce() {
        let err = RuntimeConfig::from_lookup(lookup(&[("STEPFLOW_DEBOUNCE_MS", "soon")])).unwrap_err();
        assert!(matches!(err, StepflowError::Config(_)));
    }

    #[test]
    fn test_invalid_submit_url() {
        assert!(RuntimeConfig::default().with_submit_url("not a url").is_err());
        assert!(RuntimeConfig::default().with_submit_url("ftp://example.com").is_err());
    }
}
