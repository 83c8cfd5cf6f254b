// SPDX-License-Identifier: MIT

//! The branching-logic runtime
//!
//! Pure pieces (`condition`, `rules`, `validate`, `template`, `advance`)
//! are composed by `navigation::Session`, which also talks to the value
//! store and submission sink implementations found here.

pub mod advance;
pub mod check;
pub mod condition;
pub mod document;
pub mod loader;
pub mod navigation;
pub mod rules;
pub mod state;
pub mod store;
pub mod submission;
pub mod template;
pub mod validate;
pub mod value;

pub use advance::should_auto_advance;
pub use check::check;
pub use document::Document;
pub use loader::DocumentLoader;
pub use navigation::{NavState, PageView, Session, SessionBuilder, Transition};
pub use rules::RuleOutcome;
pub use state::{VarValue, Values, Variables};
pub use validate::{validate, ErrorMap};
