// SPDX-License-Identifier: MIT

//! Page navigation for one user session
//!
//! `Session` owns the per-session state and drives transitions:
//! validate the visible blocks, run the page's rule, then advance, jump,
//! redirect, or complete.

mod controller;
mod state;
mod view;

pub use controller::{Session, SessionBuilder};
pub use state::{NavState, Transition};
pub use view::PageView;
