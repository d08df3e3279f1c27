//! Explorer session: one authenticated container plus its navigation state.
//!
//! A `Session` is an explicit context object. All transitions take
//! `&mut self`, so operations against one session are serialized and
//! independent sessions never share state.

use std::sync::Arc;

use bytes::Bytes;
use futures::TryStreamExt;
use tokio::io::AsyncWrite;
use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::config::TransferConfig;
use crate::listing::{DirectoryView, ListingEntry};
use crate::navigation::{DeleteRequest, DeleteToken, NavigationState};
use crate::resolver::list_directory;
use crate::storage::{validate_access, AzureConfig, ObjectStoreBackend, SasToken, StorageBackend};
use crate::transfer::{LocalFile, TransferController, TransferProgress, UploadReport};
use crate::{Error, Result};

/// The three connection inputs collected from the user
#[derive(Debug, Clone)]
pub struct ConnectionParams {
    /// Storage account name
    pub account: String,
    /// Container name
    pub container: String,
    /// Shared access signature
    pub credential: SasToken,
    /// Custom endpoint (sovereign clouds, Azurite)
    pub endpoint: Option<String>,
    /// Allow plain HTTP, for local emulators
    pub allow_http: bool,
}

impl ConnectionParams {
    pub fn new(
        account: impl Into<String>,
        container: impl Into<String>,
        credential: SasToken,
    ) -> Self {
        Self {
            account: account.into(),
            container: container.into(),
            credential,
            endpoint: None,
            allow_http: false,
        }
    }

    /// Reject missing inputs before any request is made
    pub fn validate(&self) -> Result<()> {
        if self.account.trim().is_empty()
            || self.container.trim().is_empty()
            || self.credential.is_empty()
        {
            return Err(Error::Config(
                "Account name, container name and SAS token are all required".to_string(),
            ));
        }
        Ok(())
    }

    fn azure_config(&self) -> AzureConfig {
        AzureConfig {
            account_name: self.account.clone(),
            container_name: self.container.clone(),
            sas_token: self.credential.clone(),
            endpoint: self.endpoint.clone(),
            allow_http: self.allow_http,
        }
    }
}

/// Result of a confirmed delete
#[derive(Debug, Default)]
pub struct DeleteReport {
    /// Key or directory prefix that was deleted
    pub target: String,
    /// Objects removed
    pub deleted: Vec<String>,
    /// Objects that had already vanished
    pub missing: Vec<String>,
    /// Objects that could not be removed
    pub failed: Vec<(String, Error)>,
}

impl DeleteReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Outcome of [`Session::request_delete`]
#[derive(Debug)]
pub enum DeleteOutcome {
    /// Nothing deleted yet; request again in the same view to confirm
    ConfirmationRequired(DeleteToken),
    /// The entry was deleted
    Deleted(DeleteReport),
}

/// An open connection to one container
pub struct Session {
    storage: Arc<dyn StorageBackend>,
    location: String,
    transfers: TransferController,
    nav: NavigationState,
}

impl Session {
    /// Connect to an Azure container with a SAS token.
    ///
    /// Fails with a `Config` error for missing inputs, `AccessDenied` when the
    /// credential is refused and `Connection` for anything else. No session
    /// exists unless the access-check listing succeeds.
    pub async fn connect(params: &ConnectionParams, transfer: &TransferConfig) -> Result<Self> {
        params.validate()?;
        let backend = ObjectStoreBackend::azure(&params.azure_config())?;
        let location = format!("azure://{}/{}", params.account, params.container);
        Self::open(Arc::new(backend), location, transfer).await
    }

    /// Open a session over an existing backend, validating access first.
    pub async fn open(
        storage: Arc<dyn StorageBackend>,
        location: impl Into<String>,
        transfer: &TransferConfig,
    ) -> Result<Self> {
        let location = location.into();
        if let Err(e) = validate_access(storage.as_ref()).await {
            warn!("Connection to {} failed: {}", location, e);
            return Err(e);
        }

        let transfers = TransferController::new(storage.clone(), transfer)?;
        info!("Connected to {}", location);

        Ok(Self {
            storage,
            location,
            transfers,
            nav: NavigationState::new(),
        })
    }

    /// Where this session points, e.g. `azure://account/container`
    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn navigation(&self) -> &NavigationState {
        &self.nav
    }

    pub fn current_prefix(&self) -> &str {
        self.nav.current_prefix()
    }

    /// Subscribe to download progress updates
    pub fn progress_receiver(&self) -> broadcast::Receiver<TransferProgress> {
        self.transfers.progress_receiver()
    }

    /// List the current directory. Starts a new view version, which drops
    /// any pending delete confirmations.
    pub async fn list(&mut self) -> Result<DirectoryView> {
        let version = self.nav.begin_view();
        let mut view = list_directory(self.storage.as_ref(), self.nav.current_prefix()).await?;
        view.version = version;
        Ok(view)
    }

    /// Re-list the current directory unchanged
    pub async fn refresh(&mut self) -> Result<DirectoryView> {
        self.list().await
    }

    /// Enter a directory entry and list it
    pub async fn enter(&mut self, entry: &ListingEntry) -> Result<DirectoryView> {
        self.nav.enter_directory(entry)?;
        self.list().await
    }

    /// Go to the parent directory and list it; stays put at the root
    pub async fn back(&mut self) -> Result<DirectoryView> {
        self.nav.go_back();
        self.list().await
    }

    /// Two-step delete of a file or a whole virtual directory.
    ///
    /// The first call only marks the entry. The second call in the same view
    /// deletes it: a file is removed directly; a directory removes every
    /// object under its prefix, tolerating objects that vanish meanwhile.
    pub async fn request_delete(&mut self, entry: &ListingEntry) -> Result<DeleteOutcome> {
        let token = match self.nav.request_delete(entry) {
            DeleteRequest::ConfirmationRequired(token) => {
                return Ok(DeleteOutcome::ConfirmationRequired(token));
            }
            DeleteRequest::Confirmed(token) => token,
        };

        let report = match entry {
            ListingEntry::File { name, .. } => {
                self.storage.delete(name).await?;
                DeleteReport {
                    target: name.clone(),
                    deleted: vec![name.clone()],
                    ..Default::default()
                }
            }
            ListingEntry::Directory { name } => self.delete_prefix(name).await?,
        };

        if report.is_complete() {
            self.nav.clear_pending(&token.key);
        }
        info!(
            "Deleted {}: {} removed, {} already gone, {} failed",
            report.target,
            report.deleted.len(),
            report.missing.len(),
            report.failed.len()
        );
        Ok(DeleteOutcome::Deleted(report))
    }

    async fn delete_prefix(&self, prefix: &str) -> Result<DeleteReport> {
        // Collect first so deletes never race the listing they came from.
        let keys: Vec<String> = self
            .storage
            .list(prefix)
            .map_ok(|object| object.key)
            .try_collect()
            .await?;

        let mut report = DeleteReport {
            target: prefix.to_string(),
            ..Default::default()
        };

        for key in keys {
            match self.storage.delete(&key).await {
                Ok(()) => report.deleted.push(key),
                Err(e) if e.is_not_found() => {
                    warn!("Object {} vanished before it could be deleted", key);
                    report.missing.push(key);
                }
                Err(e) => {
                    warn!("Failed to delete {}: {}", key, e);
                    report.failed.push((key, e));
                }
            }
        }

        Ok(report)
    }

    /// Upload files into the current directory
    pub async fn upload<I>(&self, files: I) -> UploadReport
    where
        I: IntoIterator<Item = LocalFile>,
    {
        self.transfers.upload(files, self.nav.current_prefix()).await
    }

    /// Download a file entry into memory
    pub async fn download(&self, entry: &ListingEntry) -> Result<Bytes> {
        let key = Self::file_key(entry)?;
        self.transfers.download(key).await
    }

    /// Stream a file entry into `writer`
    pub async fn download_to<W>(&self, entry: &ListingEntry, writer: &mut W) -> Result<u64>
    where
        W: AsyncWrite + Unpin + Send,
    {
        let key = Self::file_key(entry)?;
        self.transfers.download_to(key, writer).await
    }

    fn file_key(entry: &ListingEntry) -> Result<&str> {
        match entry {
            ListingEntry::File { name, .. } => Ok(name.as_str()),
            ListingEntry::Directory { name } => Err(Error::InvalidEntry(format!(
                "'{}' is a directory and cannot be downloaded",
                name
            ))),
        }
    }

    /// Close the session, dropping the client and all navigation state
    pub fn disconnect(mut self) {
        self.nav.reset();
        info!("Disconnected from {}", self.location);
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("location", &self.location)
            .field("nav", &self.nav)
            .finish_non_exhaustive()
    }
}
