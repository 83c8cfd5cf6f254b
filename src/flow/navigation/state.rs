// SPDX-License-Identifier: MIT

use crate::flow::validate::ErrorMap;
use crate::kit::observer::PageRef;

/// Where a session is in its lifecycle
#[derive(Debug, Clone, PartialEq)]
pub enum NavState {
    /// Showing a page and accepting input
    Active { index: usize },
    /// Leaving page `from`; further `next()` calls are ignored
    Transitioning { from: usize },
    /// Left the sequence through a page's redirect URL
    Redirecting { url: String },
    /// Finished the last page
    Completed,
}

impl NavState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, NavState::Redirecting { .. } | NavState::Completed)
    }

    pub fn is_active(&self) -> bool {
        matches!(self, NavState::Active { .. })
    }
}

/// Outcome of a navigation request
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// Another transition is in flight, or the session already ended
    Ignored,
    /// Validation failed; the session stays on the same page
    Invalid(ErrorMap),
    /// A new page is active
    Moved(PageRef),
    /// The session ended on a redirect page; the caller navigates away
    Redirected(String),
    /// The session ended after the last page
    Completed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(NavState::Completed.is_terminal());
        assert!(NavState::Redirecting {
            url: "https://example.com".into()
        }
        .is_terminal());
        assert!(!NavState::Transitioning { from: 0 }.is_terminal());
        assert!(NavState::Active { index: 2 }.is_active());
    }
}
