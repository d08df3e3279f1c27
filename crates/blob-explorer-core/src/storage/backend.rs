//! Storage backend trait definition.

use std::ops::Range;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::stream::BoxStream;

use crate::Result;

/// One object as reported by a prefix listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawObject {
    /// Full object key
    pub key: String,
    /// Size in bytes
    pub size: u64,
    /// Last modified timestamp
    pub last_modified: DateTime<Utc>,
}

/// Trait for storage backends
///
/// Every call is a fresh round trip to the store; nothing is cached.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Short name used in log and error messages
    fn name(&self) -> &'static str;

    /// Every object whose key starts with `prefix`, at any depth.
    ///
    /// The stream is lazy and re-queries the store each time it is called.
    fn list(&self, prefix: &str) -> BoxStream<'_, Result<RawObject>>;

    /// Read a whole object
    async fn get(&self, key: &str) -> Result<Bytes>;

    /// Read a byte range of an object
    async fn get_range(&self, key: &str, range: Range<u64>) -> Result<Bytes>;

    /// Object metadata without its contents
    async fn head(&self, key: &str) -> Result<RawObject>;

    /// Write data to a key, replacing any existing object
    async fn put(&self, key: &str, data: Bytes) -> Result<()>;

    /// Delete a key
    async fn delete(&self, key: &str) -> Result<()>;
}
