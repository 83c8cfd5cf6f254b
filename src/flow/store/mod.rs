// SPDX-License-Identifier: MIT

//! Local value cache implementations
//!
//! - `MemoryValueStore` - process-local map
//! - `FileValueStore` - one JSON file per key
//! - `DebouncedStore` - coalesces writes and swallows failures

mod debounce;
mod file;
mod memory;

pub use debounce::DebouncedStore;
pub use file::FileValueStore;
pub use memory::MemoryValueStore;
