//! Record store abstraction trait
//!
//! This module defines the RecordStore trait that all record backends must implement.

use async_trait::async_trait;
use securepaste_core::models::{Record, RecordKey};
use securepaste_core::{AppError, StoreBackend};
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Record identifier already in use: {0}")]
    DuplicateId(String),

    #[error("Invalid record identifier: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(msg) => AppError::NotFound(msg),
            StorageError::InvalidKey(msg) => AppError::InvalidIdentifier(msg),
            StorageError::WriteFailed(msg)
            | StorageError::DeleteFailed(msg)
            | StorageError::DuplicateId(msg)
            | StorageError::BackendError(msg) => AppError::Io(msg),
            StorageError::IoError(err) => AppError::Io(format!("IO error: {}", err)),
            StorageError::ConfigError(msg) => AppError::Internal(msg),
        }
    }
}

/// Result of a best-effort listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecentRecords {
    /// Newest first
    pub records: Vec<Record>,
    /// Entries that were selected but could not be read or parsed, plus names that are
    /// not record keys at all
    pub skipped: usize,
}

/// Record store abstraction trait
///
/// The local filesystem store and the in-memory store both implement this trait, so the
/// commit, index, and deletion services never depend on where records physically live.
///
/// Records are immutable: there is no update, only `put` of a brand-new key and
/// `delete_by_id`.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Persist a new record under `key`.
    ///
    /// The record becomes visible to readers all at once or not at all. Fails with
    /// `DuplicateId` if any stored record already uses `key.id`.
    async fn put(&self, key: &RecordKey, record: &Record) -> StorageResult<()>;

    /// Up to `limit` records ordered by timestamp descending (identifier descending on ties).
    ///
    /// Unreadable or unparsable entries are skipped and counted instead of failing the call.
    async fn list_recent(&self, limit: usize) -> StorageResult<RecentRecords>;

    /// Remove every record whose key carries `id`; returns how many were removed.
    ///
    /// The id is matched whole against the part of the key after its first `_`, so ids that
    /// themselves contain `_` are not matched by suffix.
    ///
    /// Fails with `InvalidKey` for identifiers with path characters and `NotFound` when
    /// nothing matches.
    async fn delete_by_id(&self, id: &str) -> StorageResult<usize>;

    /// Cheap check used by health checks
    async fn check(&self) -> StorageResult<()>;

    /// Get the storage backend type
    fn backend_type(&self) -> StoreBackend;
}
