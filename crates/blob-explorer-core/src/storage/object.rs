//! `StorageBackend` implementation over any `object_store` store.

use std::ops::Range;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use futures::StreamExt;
use object_store::path::Path;
use object_store::{ObjectMeta, ObjectStore, PutPayload};
use tracing::debug;

use super::{RawObject, StorageBackend};
use crate::error::StorageError;
use crate::path::DELIMITER;
use crate::{Error, Result};

/// Storage backend wrapping an `object_store` client.
///
/// Azure, local filesystem and in-memory stores all go through this type;
/// only their constructors differ.
pub struct ObjectStoreBackend {
    store: Arc<dyn ObjectStore>,
    name: &'static str,
}

impl ObjectStoreBackend {
    /// Wrap an already configured store
    pub fn new(name: &'static str, store: Arc<dyn ObjectStore>) -> Self {
        Self { store, name }
    }

    fn op_error(&self, op: &str, key: &str, err: object_store::Error) -> Error {
        Error::Storage(StorageError::from_object_store(
            &format!("{} {}", self.name, op),
            key,
            err,
        ))
    }
}

impl std::fmt::Debug for ObjectStoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectStoreBackend")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Parse a key into a store path without rewriting it.
///
/// `Path::from` percent-encodes reserved characters and drops empty
/// segments, so keys are parsed instead and rejected unless they come back
/// byte-identical.
fn object_path(key: &str) -> Result<Path> {
    let path = Path::parse(key)
        .map_err(|e| Error::Storage(StorageError::InvalidPath(format!("{}: {}", key, e))))?;
    let raw: &str = path.as_ref();
    if raw != key {
        return Err(Error::Storage(StorageError::InvalidPath(format!(
            "{}: leading or trailing '{}' is not allowed",
            key, DELIMITER
        ))));
    }
    Ok(path)
}

fn raw_object(meta: ObjectMeta) -> RawObject {
    RawObject {
        key: String::from(meta.location),
        size: meta.size as u64,
        last_modified: meta.last_modified,
    }
}

fn to_usize_range(key: &str, range: Range<u64>) -> Result<Range<usize>> {
    let start = usize::try_from(range.start)
        .map_err(|_| Error::Storage(StorageError::InvalidPath(format!("{}: range start", key))))?;
    let end = usize::try_from(range.end)
        .map_err(|_| Error::Storage(StorageError::InvalidPath(format!("{}: range end", key))))?;
    Ok(start..end)
}

#[async_trait]
impl StorageBackend for ObjectStoreBackend {
    fn name(&self) -> &'static str {
        self.name
    }

    fn list(&self, prefix: &str) -> BoxStream<'_, Result<RawObject>> {
        // object_store matches prefixes per segment, so list from the last
        // complete segment and filter the remainder as a plain string prefix.
        let root = match prefix.rfind(DELIMITER) {
            Some(idx) => match object_path(&prefix[..idx]) {
                Ok(path) => Some(path),
                Err(e) => return futures::stream::once(futures::future::ready(Err(e))).boxed(),
            },
            None => None,
        };
        debug!("{} LIST: {}", self.name, prefix);

        let name = self.name;
        let prefix = prefix.to_string();
        self.store
            .list(root.as_ref())
            .filter_map(move |result| {
                let item = match result {
                    Ok(meta) => {
                        let object = raw_object(meta);
                        object.key.starts_with(&prefix).then_some(Ok(object))
                    }
                    Err(e) => Some(Err(Error::Storage(StorageError::from_object_store(
                        &format!("{} LIST", name),
                        &prefix,
                        e,
                    )))),
                };
                futures::future::ready(item)
            })
            .boxed()
    }

    async fn get(&self, key: &str) -> Result<Bytes> {
        let path = object_path(key)?;
        debug!("{} GET: {}", self.name, path);

        let result = self
            .store
            .get(&path)
            .await
            .map_err(|e| self.op_error("GET", key, e))?;

        result
            .bytes()
            .await
            .map_err(|e| self.op_error("GET (body)", key, e))
    }

    async fn get_range(&self, key: &str, range: Range<u64>) -> Result<Bytes> {
        let path = object_path(key)?;
        debug!("{} GET {}..{}: {}", self.name, range.start, range.end, path);

        let range = to_usize_range(key, range)?;
        self.store
            .get_range(&path, range)
            .await
            .map_err(|e| self.op_error("GET RANGE", key, e))
    }

    async fn head(&self, key: &str) -> Result<RawObject> {
        let path = object_path(key)?;
        debug!("{} HEAD: {}", self.name, path);

        let meta = self
            .store
            .head(&path)
            .await
            .map_err(|e| self.op_error("HEAD", key, e))?;

        Ok(raw_object(meta))
    }

    async fn put(&self, key: &str, data: Bytes) -> Result<()> {
        let path = object_path(key)?;
        debug!("{} PUT: {} ({} bytes)", self.name, path, data.len());

        self.store
            .put(&path, PutPayload::from_bytes(data))
            .await
            .map_err(|e| self.op_error("PUT", key, e))?;

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let path = object_path(key)?;
        debug!("{} DELETE: {}", self.name, path);

        self.store
            .delete(&path)
            .await
            .map_err(|e| self.op_error("DELETE", key, e))?;

        Ok(())
    }
}
