//! Upload and chunked download.

use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::config::TransferConfig;
use crate::error::StorageError;
use crate::listing::format_bytes;
use crate::path::{join_key, DELIMITER};
use crate::storage::StorageBackend;
use crate::{Error, Result};

/// Progress update sent after every downloaded chunk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferProgress {
    /// Object being transferred
    pub key: String,
    /// Bytes transferred so far
    pub bytes_read: u64,
    /// Object size
    pub total_bytes: u64,
}

impl TransferProgress {
    /// Completed fraction in `0.0..=1.0`; an empty object counts as complete
    pub fn fraction(&self) -> f64 {
        if self.total_bytes == 0 {
            1.0
        } else {
            self.bytes_read as f64 / self.total_bytes as f64
        }
    }

    pub fn is_complete(&self) -> bool {
        self.bytes_read >= self.total_bytes
    }

    /// Format progress as a human-readable string
    pub fn format(&self) -> String {
        format!(
            "[{:.1}%] {} ({} / {})",
            self.fraction() * 100.0,
            self.key,
            format_bytes(self.bytes_read),
            format_bytes(self.total_bytes)
        )
    }
}

/// A file supplied by the caller for upload
#[derive(Debug, Clone)]
pub struct LocalFile {
    /// Base file name, without any directory part
    pub name: String,
    /// File contents
    pub data: Bytes,
}

impl LocalFile {
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }

    /// Read a local file; the object name is its base file name
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| Error::Config(format!("Not a file path: {}", path.display())))?;
        let data = tokio::fs::read(path).await?;
        Ok(Self::new(name, data))
    }
}

/// Result of uploading one file
#[derive(Debug)]
pub struct UploadOutcome {
    /// Local file name
    pub name: String,
    /// Destination key
    pub key: String,
    /// Bytes sent
    pub size: u64,
    pub result: Result<()>,
}

/// Per-file results of a batch upload
#[derive(Debug, Default)]
pub struct UploadReport {
    pub outcomes: Vec<UploadOutcome>,
}

impl UploadReport {
    pub fn succeeded(&self) -> impl Iterator<Item = &UploadOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_ok())
    }

    pub fn failed(&self) -> impl Iterator<Item = &UploadOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_err())
    }

    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }
}

/// Runs uploads and downloads against one backend
pub struct TransferController {
    storage: Arc<dyn StorageBackend>,
    chunk_size: u64,
    progress_tx: broadcast::Sender<TransferProgress>,
}

impl TransferController {
    pub fn new(storage: Arc<dyn StorageBackend>, config: &TransferConfig) -> Result<Self> {
        config.validate()?;
        let (progress_tx, _) = broadcast::channel(100);
        Ok(Self {
            storage,
            chunk_size: config.chunk_size,
            progress_tx,
        })
    }

    /// Subscribe to download progress updates
    pub fn progress_receiver(&self) -> broadcast::Receiver<TransferProgress> {
        self.progress_tx.subscribe()
    }

    pub fn chunk_size(&self) -> u64 {
        self.chunk_size
    }

    /// Upload every file under `prefix`, overwriting existing objects.
    ///
    /// Each file succeeds or fails on its own; a failure never stops the
    /// remaining uploads.
    pub async fn upload<I>(&self, files: I, prefix: &str) -> UploadReport
    where
        I: IntoIterator<Item = LocalFile>,
    {
        let mut report = UploadReport::default();

        for file in files {
            let key = join_key(prefix, &file.name);
            let size = file.data.len() as u64;

            let result = if file.name.is_empty() || file.name.contains(DELIMITER) {
                Err(Error::Storage(StorageError::InvalidPath(format!(
                    "File name must be a single path segment: '{}'",
                    file.name
                ))))
            } else {
                self.storage.put(&key, file.data).await
            };

            match &result {
                Ok(()) => info!("Uploaded {} to {} ({})", file.name, key, format_bytes(size)),
                Err(e) => warn!("Failed to upload {}: {}", file.name, e),
            }

            report.outcomes.push(UploadOutcome {
                name: file.name,
                key,
                size,
                result,
            });
        }

        report
    }

    /// Download an object into memory, reporting progress per chunk.
    pub async fn download(&self, key: &str) -> Result<Bytes> {
        let mut buffer = Vec::new();
        self.download_to(key, &mut buffer).await?;
        Ok(Bytes::from(buffer))
    }

    /// Stream an object into `writer` chunk by chunk, reporting progress per
    /// chunk. Returns the number of bytes written.
    ///
    /// Use this instead of [`download`](Self::download) for objects too large
    /// to hold in memory.
    pub async fn download_to<W>(&self, key: &str, writer: &mut W) -> Result<u64>
    where
        W: AsyncWrite + Unpin + Send,
    {
        let meta = self.storage.head(key).await?;
        let total = meta.size;
        debug!(
            "Downloading {} ({}) in chunks of {}",
            key,
            format_bytes(total),
            format_bytes(self.chunk_size)
        );

        let mut offset = 0u64;
        while offset < total {
            let end = offset.saturating_add(self.chunk_size).min(total);
            let chunk = self.storage.get_range(key, offset..end).await?;
            if chunk.is_empty() {
                return Err(Error::Storage(StorageError::Backend(format!(
                    "Object {} ended at {} of {} bytes",
                    key, offset, total
                ))));
            }

            writer.write_all(&chunk).await?;
            offset += chunk.len() as u64;
            self.report(key, offset, total);
        }

        if total == 0 {
            self.report(key, 0, 0);
        }
        writer.flush().await?;

        info!("Downloaded {} ({})", key, format_bytes(offset));
        Ok(offset)
    }

    fn report(&self, key: &str, bytes_read: u64, total_bytes: u64) {
        // No subscribers is fine
        let _ = self.progress_tx.send(TransferProgress {
            key: key.to_string(),
            bytes_read,
            total_bytes,
        });
    }
}
