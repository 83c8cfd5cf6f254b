// SPDX-License-Identifier: MIT

//! Submission sink implementations

mod http;
mod memory;

pub use http::HttpSubmissionSink;
pub use memory::MemorySink;
