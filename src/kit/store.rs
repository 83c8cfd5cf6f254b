// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::flow::state::Values;
use crate::kit::error::Result;

/// Local cache of a session's answers, keyed by
/// `"{doctype}-{documentId}-values"`.
///
/// Callers treat every operation as best-effort.
#[async_trait]
pub trait ValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Values>>;

    async fn set(&self, key: &str, values: &Values) -> Result<()>;

    async fn clear(&self, key: &str) -> Result<()>;
}
