//! Blob Explorer Core Library
//!
//! Browse a flat object store as a tree of virtual directories: list one
//! level at a time, navigate in and out, upload, download with progress, and
//! delete files or whole directories with a two-step confirmation.

pub mod config;
pub mod error;
pub mod listing;
pub mod navigation;
pub mod path;
pub mod resolver;
pub mod session;
pub mod storage;
pub mod transfer;

pub use config::{ExplorerConfig, TransferConfig, DEFAULT_CHUNK_SIZE};
pub use error::{Error, Result, StorageError};
pub use listing::{format_bytes, DirectoryView, ListingEntry};
pub use navigation::{DeleteRequest, DeleteToken, NavigationState};
pub use resolver::{list_directory, resolve};
pub use session::{ConnectionParams, DeleteOutcome, DeleteReport, Session};
pub use storage::{
    create_backend, validate_access, ObjectStoreBackend, RawObject, SasToken, StorageBackend,
    StorageBackendConfig,
};
pub use transfer::{LocalFile, TransferController, TransferProgress, UploadOutcome, UploadReport};
