//! Local filesystem storage backend.

use std::path::Path;
use std::sync::Arc;

use object_store::local::LocalFileSystem;
use tracing::info;

use super::ObjectStoreBackend;
use crate::error::StorageError;
use crate::{Error, Result};

impl ObjectStoreBackend {
    /// Create a backend rooted at a local directory, creating it if needed.
    ///
    /// Keys map to relative file paths; "directories" are still derived from
    /// key prefixes, so empty folders on disk are invisible.
    pub fn filesystem(root: &Path) -> Result<Self> {
        std::fs::create_dir_all(root)?;

        let store = LocalFileSystem::new_with_prefix(root).map_err(|e| {
            Error::Storage(StorageError::Backend(format!(
                "Failed to open {}: {}",
                root.display(),
                e
            )))
        })?;

        info!("Created filesystem backend at: {}", root.display());
        Ok(Self::new("Filesystem", Arc::new(store)))
    }
}
