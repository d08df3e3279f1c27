//! Configuration structures for the explorer.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::storage::StorageBackendConfig;

/// Default download chunk size (1 MiB)
pub const DEFAULT_CHUNK_SIZE: u64 = 1024 * 1024;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplorerConfig {
    /// Storage configuration (Azure, Filesystem, Memory)
    pub storage: StorageBackendConfig,

    /// Transfer tuning
    #[serde(default)]
    pub transfer: TransferConfig,
}

/// Upload/download tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferConfig {
    /// Bytes requested per ranged read during downloads
    #[serde(default = "default_chunk_size")]
    pub chunk_size: u64,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
        }
    }
}

fn default_chunk_size() -> u64 {
    DEFAULT_CHUNK_SIZE
}

impl TransferConfig {
    pub fn validate(&self) -> crate::Result<()> {
        if self.chunk_size == 0 {
            return Err(crate::Error::Config(
                "transfer.chunk_size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl ExplorerConfig {
    /// Parse and validate a YAML document
    pub fn from_yaml(yaml: &str) -> crate::Result<Self> {
        let config: ExplorerConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML configuration file
    pub async fn from_file(path: impl AsRef<Path>) -> crate::Result<Self> {
        let content = tokio::fs::read_to_string(path.as_ref()).await?;
        Self::from_yaml(&content)
    }

    /// Configuration for a storage URL with default transfer settings
    pub fn from_url(url: &str) -> crate::Result<Self> {
        Ok(Self {
            storage: StorageBackendConfig::from_url(url)?,
            transfer: TransferConfig::default(),
        })
    }

    pub fn validate(&self) -> crate::Result<()> {
        // Required storage fields are enforced by the tagged enum at
        // deserialization time.
        self.transfer.validate()
    }
}
