//! Storage backend abstraction and implementations.
//!
//! The explorer only needs four primitives from an object store: prefix
//! listing with size and timestamps, get, put and delete. Backends:
//!
//! - **Azure**: Azure Blob Storage, authorized by a SAS token
//! - **Filesystem**: Local filesystem storage
//! - **Memory**: In-memory storage (for testing)

mod azure;
mod backend;
mod config;
mod filesystem;
mod memory;
mod object;

pub use azure::{AzureConfig, SasToken, SAS_TOKEN_ENV};
pub use backend::{RawObject, StorageBackend};
pub use config::StorageBackendConfig;
pub use object::ObjectStoreBackend;

use std::sync::Arc;

use futures::StreamExt;
use tracing::debug;

use crate::error::StorageError;
use crate::{Error, Result};

/// Create a storage backend from configuration.
///
/// Only builds the client; no request is sent until the first operation.
pub fn create_backend(config: &StorageBackendConfig) -> Result<Arc<dyn StorageBackend>> {
    match config {
        StorageBackendConfig::Azure { .. } => {
            let azure = config
                .azure_config()?
                .ok_or_else(|| Error::Config("Expected Azure configuration".to_string()))?;
            Ok(Arc::new(ObjectStoreBackend::azure(&azure)?))
        }
        StorageBackendConfig::Filesystem { path } => {
            Ok(Arc::new(ObjectStoreBackend::filesystem(path)?))
        }
        StorageBackendConfig::Memory => Ok(Arc::new(ObjectStoreBackend::in_memory())),
    }
}

/// Check that a backend is usable by fetching at most one listing entry.
///
/// This is the only credential check the explorer performs. Access failures
/// are reported as [`StorageError::AccessDenied`]; everything else becomes
/// [`Error::Connection`].
pub async fn validate_access(backend: &dyn StorageBackend) -> Result<()> {
    debug!("Validating access to {} backend", backend.name());

    let mut listing = backend.list("");
    match listing.next().await {
        None | Some(Ok(_)) => Ok(()),
        Some(Err(Error::Storage(StorageError::AccessDenied(msg)))) => {
            Err(Error::Storage(StorageError::AccessDenied(msg)))
        }
        Some(Err(e)) => Err(Error::Connection(e.to_string())),
    }
}
