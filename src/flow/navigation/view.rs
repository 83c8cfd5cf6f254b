// SPDX-License-Identifier: MIT

use serde::Serialize;

use crate::flow::document::Block;
use crate::flow::validate::ErrorMap;
use crate::kit::observer::PageRef;

/// What a renderer needs to draw the active page
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageView {
    #[serde(flatten)]
    pub page: PageRef,
    /// Visible blocks with templates resolved
    pub blocks: Vec<Block>,
    pub button_text: String,
    /// Errors from the last rejected `next()`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<ErrorMap>,
    /// Share of pages before this one, in `[0, 1]`
    pub progress: f64,
}
