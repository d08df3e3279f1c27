//! In-memory storage backend for testing.

use std::sync::Arc;

use object_store::memory::InMemory;

use super::ObjectStoreBackend;

impl ObjectStoreBackend {
    /// Create an empty in-memory backend.
    ///
    /// Data is not persisted between runs, which makes it the default store
    /// for tests and dry runs.
    pub fn in_memory() -> Self {
        Self::new("Memory", Arc::new(InMemory::new()))
    }
}
