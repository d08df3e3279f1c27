//! Test helper utilities.
//!
//! Provides seeded in-memory backends and a backend wrapper that injects
//! failures for chosen keys.

use std::collections::HashSet;
use std::ops::Range;
use std::sync::Arc;

use async_trait::async_trait;
use blob_explorer_core::error::StorageError;
use blob_explorer_core::{
    Error, ObjectStoreBackend, RawObject, Result, Session, StorageBackend, TransferConfig,
};
use bytes::Bytes;
use futures::stream::BoxStream;
use futures::StreamExt;

/// The key set used throughout the listing examples
pub const SAMPLE_KEYS: &[&str] = &["a.txt", "dir/b.txt", "dir/sub/c.txt"];

/// In-memory backend holding `keys`, each containing its own key as data
pub async fn seeded_backend(keys: &[&str]) -> Arc<ObjectStoreBackend> {
    let backend = Arc::new(ObjectStoreBackend::in_memory());
    for key in keys {
        backend
            .put(key, Bytes::copy_from_slice(key.as_bytes()))
            .await
            .unwrap();
    }
    backend
}

/// Session over a seeded in-memory backend
pub async fn seeded_session(keys: &[&str]) -> (Arc<ObjectStoreBackend>, Session) {
    let backend = seeded_backend(keys).await;
    let session = Session::open(backend.clone(), "memory://", &TransferConfig::default())
        .await
        .unwrap();
    (backend, session)
}

/// Which failure to inject
#[derive(Debug, Clone, Copy)]
pub enum Fault {
    NotFound,
    AccessDenied,
    Network,
}

impl Fault {
    fn error(self, key: &str) -> Error {
        match self {
            Fault::NotFound => Error::Storage(StorageError::NotFound(key.to_string())),
            Fault::AccessDenied => Error::Storage(StorageError::AccessDenied(key.to_string())),
            Fault::Network => {
                Error::Storage(StorageError::TransientNetwork("connection reset".to_string()))
            }
        }
    }
}

/// Wraps a backend and fails writes, deletes or listings on request.
pub struct FaultyBackend {
    inner: Arc<dyn StorageBackend>,
    fail_put: HashSet<String>,
    fail_delete: HashSet<String>,
    delete_fault: Fault,
    list_fault: Option<Fault>,
}

impl FaultyBackend {
    pub fn new(inner: Arc<dyn StorageBackend>) -> Self {
        Self {
            inner,
            fail_put: HashSet::new(),
            fail_delete: HashSet::new(),
            delete_fault: Fault::NotFound,
            list_fault: None,
        }
    }

    pub fn failing_puts(mut self, keys: &[&str]) -> Self {
        self.fail_put.extend(keys.iter().map(|k| k.to_string()));
        self
    }

    pub fn failing_deletes(mut self, keys: &[&str], fault: Fault) -> Self {
        self.fail_delete.extend(keys.iter().map(|k| k.to_string()));
        self.delete_fault = fault;
        self
    }

    pub fn failing_lists(mut self, fault: Fault) -> Self {
        self.list_fault = Some(fault);
        self
    }
}

#[async_trait]
impl StorageBackend for FaultyBackend {
    fn name(&self) -> &'static str {
        "Faulty"
    }

    fn list(&self, prefix: &str) -> BoxStream<'_, Result<RawObject>> {
        match self.list_fault {
            Some(fault) => futures::stream::once(futures::future::ready(Err(fault.error(prefix))))
                .boxed(),
            None => self.inner.list(prefix),
        }
    }

    async fn get(&self, key: &str) -> Result<Bytes> {
        self.inner.get(key).await
    }

    async fn get_range(&self, key: &str, range: Range<u64>) -> Result<Bytes> {
        self.inner.get_range(key, range).await
    }

    async fn head(&self, key: &str) -> Result<RawObject> {
        self.inner.head(key).await
    }

    async fn put(&self, key: &str, data: Bytes) -> Result<()> {
        if self.fail_put.contains(key) {
            return Err(Fault::Network.error(key));
        }
        self.inner.put(key, data).await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        if self.fail_delete.contains(key) {
            return Err(self.delete_fault.error(key));
        }
        self.inner.delete(key).await
    }
}
