//! SecurePaste Services Layer
//!
//! This crate hosts the ingestion pipeline (sessions, fragments, commit) and the record
//! services built on top of the record store, and re-exports the storage API so that the
//! API and CLI crates depend on a single service facade. Keep business logic here; keep
//! thin HTTP handling in securepaste-api.

#[cfg(feature = "cleanup")]
pub mod cleanup;
pub mod commit;
pub mod deletion;
pub mod index;
pub mod paste;
pub mod session;

#[cfg(feature = "cleanup")]
pub use cleanup::SessionReaper;
pub use commit::CommitReassembler;
pub use deletion::DeletionService;
pub use index::{IndexService, LIST_LIMIT};
pub use paste::PasteService;
pub use securepaste_storage::{
    create_record_store, InMemoryRecordStore, LocalRecordStore, RecentRecords, RecordStore,
    StorageError, StorageResult, StoreBackend,
};
pub use session::{FragmentReceiver, SessionDirectoryManager};
