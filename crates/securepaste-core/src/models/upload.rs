use serde::{Deserialize, Serialize};

/// Snapshot of what an open upload session has received so far.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadProgress {
    pub session_id: String,
    /// Received sequence numbers, ascending
    pub received: Vec<u32>,
    pub received_bytes: u64,
}
