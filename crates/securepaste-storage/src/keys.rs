//! Shared file naming for the local backend.
//!
//! File name format: `{timestamp}_{id}.json`.

use securepaste_core::models::RecordKey;

pub const RECORD_EXTENSION: &str = ".json";

/// File name for a record key.
pub fn file_name(key: &RecordKey) -> String {
    format!("{}{}", key, RECORD_EXTENSION)
}

/// Recover the record key from a directory entry name.
///
/// Returns `None` for anything that is not a record file, including in-flight temp files.
pub fn parse_file_name(name: &str) -> Option<RecordKey> {
    let stem = name.strip_suffix(RECORD_EXTENSION)?;
    RecordKey::parse(stem).ok()
}
