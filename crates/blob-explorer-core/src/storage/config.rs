//! Storage configuration types.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::azure::{AzureConfig, SasToken};

/// Storage backend configuration using tagged enum for type-safe configuration.
///
/// Supports:
/// - Azure Blob Storage (SAS token authorization)
/// - Local filesystem
/// - In-memory (for testing)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "backend")]
pub enum StorageBackendConfig {
    /// Azure Blob Storage
    #[serde(rename = "azure")]
    Azure {
        /// Azure storage account name
        account_name: String,
        /// Azure blob container name
        container_name: String,
        /// SAS token (falls back to AZURE_STORAGE_SAS_TOKEN env var)
        #[serde(default)]
        sas_token: Option<SasToken>,
        /// Custom endpoint URL for sovereign clouds or Azurite
        #[serde(default)]
        endpoint: Option<String>,
        /// Allow HTTP (insecure) connections
        #[serde(default)]
        allow_http: bool,
    },

    /// Local filesystem storage
    #[serde(rename = "filesystem")]
    Filesystem {
        /// Base path for storage
        path: PathBuf,
    },

    /// In-memory storage (for testing)
    #[serde(rename = "memory")]
    Memory,
}

impl StorageBackendConfig {
    /// Parse configuration from a URL string
    ///
    /// Supported URL formats:
    /// - `azure://account/container` or `azure://account.blob.core.windows.net/container`
    /// - `file:///path/to/data`
    /// - `memory://`
    ///
    /// The SAS token is never taken from the URL; it comes from
    /// `AZURE_STORAGE_SAS_TOKEN`.
    pub fn from_url(url: &str) -> crate::Result<Self> {
        let parsed = url::Url::parse(url)
            .map_err(|e| crate::Error::Config(format!("Invalid storage URL: {}", e)))?;

        match parsed.scheme() {
            "azure" | "az" => {
                let host = parsed.host_str().unwrap_or_default();
                let account_name = host.split('.').next().unwrap_or(host).to_string();
                let container_name = parsed.path().trim_matches('/').to_string();

                if account_name.is_empty() || container_name.is_empty() {
                    return Err(crate::Error::Config(format!(
                        "Azure URL must name an account and a container: {}",
                        url
                    )));
                }

                Ok(Self::Azure {
                    account_name,
                    container_name,
                    sas_token: SasToken::from_env(),
                    endpoint: None,
                    allow_http: false,
                })
            }
            "file" => Ok(Self::Filesystem {
                path: PathBuf::from(parsed.path()),
            }),
            "memory" => Ok(Self::Memory),
            scheme => Err(crate::Error::Config(format!(
                "Unknown storage scheme: {}",
                scheme
            ))),
        }
    }

    /// Azure settings with the SAS token resolved, if this is an Azure config.
    pub fn azure_config(&self) -> crate::Result<Option<AzureConfig>> {
        match self {
            Self::Azure {
                account_name,
                container_name,
                sas_token,
                endpoint,
                allow_http,
            } => {
                let sas_token = sas_token
                    .clone()
                    .or_else(SasToken::from_env)
                    .ok_or_else(|| {
                        crate::Error::Config(format!(
                            "No SAS token configured and {} is not set",
                            super::azure::SAS_TOKEN_ENV
                        ))
                    })?;

                Ok(Some(AzureConfig {
                    account_name: account_name.clone(),
                    container_name: container_name.clone(),
                    sas_token,
                    endpoint: endpoint.clone(),
                    allow_http: *allow_http,
                }))
            }
            Self::Filesystem { .. } | Self::Memory => Ok(None),
        }
    }

    /// Human-readable location, e.g. `azure://account/container`
    pub fn location(&self) -> String {
        match self {
            Self::Azure {
                account_name,
                container_name,
                ..
            } => format!("azure://{}/{}", account_name, container_name),
            Self::Filesystem { path } => format!("file://{}", path.display()),
            Self::Memory => "memory://".to_string(),
        }
    }
}
