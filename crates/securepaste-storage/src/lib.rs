//! SecurePaste Storage Library
//!
//! This crate provides the record store abstraction and its implementations.
//!
//! # Record layout
//!
//! Every record is one JSON document addressed by the composite key `{timestamp}_{id}`.
//! The local backend stores it as `{timestamp}_{id}.json` inside a single directory; the
//! directory listing is the index. File naming is centralized in the `keys` module.

pub mod factory;
pub(crate) mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-memory")]
pub mod memory;
pub mod traits;

// Re-export commonly used types
pub use factory::create_record_store;
#[cfg(feature = "storage-local")]
pub use local::LocalRecordStore;
#[cfg(feature = "storage-memory")]
pub use memory::InMemoryRecordStore;
pub use securepaste_core::StoreBackend;
pub use traits::{RecentRecords, RecordStore, StorageError, StorageResult};
