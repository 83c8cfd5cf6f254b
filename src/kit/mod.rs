// SPDX-License-Identifier: MIT

//! Runtime seams: errors, configuration, and the traits external
//! collaborators implement.

pub mod config;
pub mod error;
pub mod observer;
pub mod sink;
pub mod store;

pub use config::RuntimeConfig;
pub use error::{DocumentError, Result, StepflowError};
pub use observer::{NoopObserver, PageCompletion, PageRef, SessionObserver};
pub use sink::{Answer, Submission, SubmissionSink};
pub use store::ValueStore;
