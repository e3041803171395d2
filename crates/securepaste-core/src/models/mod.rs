//! Domain models

pub mod paste;
pub mod record;
pub mod upload;

pub use paste::{EncryptedPayload, NewPaste, PasteContent};
pub use record::{Record, RecordKey, RESERVED_FIELDS};
pub use upload::UploadProgress;
