// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use serde::Serialize;

use crate::flow::state::Values;
use crate::kit::error::Result;

/// Identifies a page in an event payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageRef {
    pub id: String,
    pub index: usize,
    pub name: String,
}

/// Payload for a page the user is leaving, with only that page's answers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageCompletion {
    #[serde(flatten)]
    pub page: PageRef,
    pub values: Values,
}

/// Receives navigation events from a session.
///
/// All methods default to no-ops. `on_complete` is called exactly once per
/// session; an error from it is logged and otherwise ignored.
#[async_trait]
pub trait SessionObserver: Send + Sync {
    /// The active page changed
    fn on_page_change(&self, _page: &PageRef) {}

    /// A page was completed, right before navigating away from it
    fn on_page_complete(&self, _completion: &PageCompletion) {}

    /// The session reached the end of the sequence or a redirect page
    async fn on_complete(&self, _values: &Values, _redirect_url: Option<&str>) -> Result<()> {
        Ok(())
    }
}

/// Observer that ignores every event
pub struct NoopObserver;

impl SessionObserver for NoopObserver {}
