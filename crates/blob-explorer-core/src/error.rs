//! Error types for the blob explorer core library.

use thiserror::Error;

/// Result type alias using the library's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the blob explorer library.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Storage error
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The account, container or credential could not be used to open a session
    #[error("Connection failed: {0}")]
    Connection(String),

    /// A navigation transition was given an entry of the wrong kind
    #[error("Invalid entry: {0}")]
    InvalidEntry(String),
}

impl Error {
    /// Whether the caller may retry the operation unchanged.
    ///
    /// Only transport-level failures qualify; the core never retries on its own.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Storage(StorageError::TransientNetwork(_)))
    }

    /// Whether this error reports a missing object.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Storage(StorageError::NotFound(_)))
    }
}

/// Storage-specific errors
#[derive(Error, Debug)]
pub enum StorageError {
    /// Object not found
    #[error("Object not found: {0}")]
    NotFound(String),

    /// The credential lacks permission for the operation
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// Connectivity failure; retryable by the caller
    #[error("Network error: {0}")]
    TransientNetwork(String),

    /// Storage backend error
    #[error("Backend error: {0}")]
    Backend(String),

    /// Invalid path
    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

impl StorageError {
    /// Convert an `object_store` failure into the explorer's error kinds.
    ///
    /// `op` names the backend and operation for the message, e.g. `"Azure GET"`.
    pub fn from_object_store(op: &str, key: &str, err: object_store::Error) -> Self {
        match err {
            object_store::Error::NotFound { .. } => StorageError::NotFound(key.to_string()),
            object_store::Error::PermissionDenied { .. }
            | object_store::Error::Unauthenticated { .. } => {
                StorageError::AccessDenied(format!("{} failed for '{}': {}", op, key, err))
            }
            object_store::Error::Generic { .. } => {
                StorageError::TransientNetwork(format!("{} failed: {}", op, err))
            }
            object_store::Error::InvalidPath { .. } => StorageError::InvalidPath(key.to_string()),
            _ => StorageError::Backend(format!("{} failed: {}", op, err)),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
