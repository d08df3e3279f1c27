//! Azure Blob Storage backend construction.

use std::fmt;
use std::sync::Arc;

use object_store::azure::{AzureConfigKey, MicrosoftAzureBuilder};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::ObjectStoreBackend;
use crate::error::StorageError;
use crate::{Error, Result};

/// Environment variable consulted when no SAS token is configured
pub const SAS_TOKEN_ENV: &str = "AZURE_STORAGE_SAS_TOKEN";

/// Shared access signature token.
///
/// Never printed: `Debug` and `Display` are redacted and there is no
/// accessor outside this crate.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SasToken(String);

impl SasToken {
    /// Wrap a raw token, with or without its leading `?`
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Read the token from `AZURE_STORAGE_SAS_TOKEN`
    pub fn from_env() -> Option<Self> {
        std::env::var(SAS_TOKEN_ENV)
            .ok()
            .filter(|t| !t.trim().is_empty())
            .map(Self)
    }

    /// Whether the token has no content
    pub fn is_empty(&self) -> bool {
        self.query().is_empty()
    }

    pub(crate) fn query(&self) -> &str {
        self.0.trim().trim_start_matches('?')
    }
}

impl fmt::Debug for SasToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SasToken(<redacted>)")
    }
}

impl fmt::Display for SasToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

/// Azure Blob Storage backend configuration
#[derive(Debug, Clone)]
pub struct AzureConfig {
    /// Azure storage account name
    pub account_name: String,
    /// Azure blob container name
    pub container_name: String,
    /// SAS token for shared access signature authentication
    pub sas_token: SasToken,
    /// Custom endpoint URL (sovereign clouds, Azurite)
    pub endpoint: Option<String>,
    /// Allow plain HTTP, for local emulators
    pub allow_http: bool,
}

impl ObjectStoreBackend {
    /// Create a backend for one Azure container, authorized by SAS token.
    ///
    /// Building the client performs no network call; use
    /// [`validate_access`](super::validate_access) to check the credential.
    pub fn azure(config: &AzureConfig) -> Result<Self> {
        if config.sas_token.is_empty() {
            return Err(Error::Config("SAS token must not be empty".to_string()));
        }

        let mut builder = MicrosoftAzureBuilder::new()
            .with_account(&config.account_name)
            .with_container_name(&config.container_name)
            .with_config(AzureConfigKey::SasKey, config.sas_token.query())
            .with_allow_http(config.allow_http);

        if let Some(endpoint) = &config.endpoint {
            builder = builder.with_endpoint(endpoint.clone());
        }
        debug!("Azure authentication: SAS token");

        let store = builder.build().map_err(|e| {
            Error::Storage(StorageError::Backend(format!(
                "Failed to create Azure client: {}",
                e
            )))
        })?;

        info!(
            "Created Azure backend for account: {}, container: {}, endpoint: {:?}",
            config.account_name, config.container_name, config.endpoint
        );

        Ok(Self::new("Azure", Arc::new(store)))
    }
}
