//! Unit tests for blob-explorer-core.
//!
//! Exercise the public API end to end over in-memory storage.

pub mod helpers;
pub mod navigation;
pub mod session;
