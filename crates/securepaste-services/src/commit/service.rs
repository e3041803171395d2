use crate::session::SessionDirectoryManager;
use securepaste_core::models::{Record, RecordKey};
use securepaste_core::AppError;
use securepaste_storage::RecordStore;
use serde_json::{Map, Value};
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;
use tokio::fs;

/// Turns a finished upload session into a stored record.
#[derive(Clone)]
pub struct CommitReassembler {
    sessions: SessionDirectoryManager,
    store: Arc<dyn RecordStore>,
}

impl CommitReassembler {
    pub fn new(sessions: SessionDirectoryManager, store: Arc<dyn RecordStore>) -> Self {
        Self { sessions, store }
    }

    /// Validate, merge and persist fragments `0..expected_count`; returns the new record id.
    ///
    /// The session is claimed before anything is read, so of two racing commits only one
    /// proceeds and the other gets session-not-found. Once claimed it is destroyed whatever the
    /// outcome, so a failed commit cannot be retried against the same session.
    #[tracing::instrument(skip(self))]
    pub async fn commit(&self, session_id: &str, expected_count: u32) -> Result<String, AppError> {
        let start = std::time::Instant::now();
        let session_dir = self.sessions.claim(session_id).await?;

        let result = self.reassemble_and_store(&session_dir, expected_count).await;

        if let Err(e) = self.sessions.release_claim(&session_dir).await {
            tracing::warn!(error = %e, session_id = %session_id, "Failed to remove committed session");
        }

        match &result {
            Ok(record_id) => tracing::info!(
                session_id = %session_id,
                record_id = %record_id,
                expected_count,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Upload committed"
            ),
            Err(e) => tracing::info!(
                session_id = %session_id,
                expected_count,
                error = %e,
                "Upload commit failed, session discarded"
            ),
        }

        result
    }

    async fn reassemble_and_store(
        &self,
        session_dir: &Path,
        expected_count: u32,
    ) -> Result<String, AppError> {
        ensure_complete(session_dir, expected_count).await?;
        let merged = merge(session_dir, expected_count).await?;
        let fields = parse_object(&merged)?;
        drop(merged);

        let key = RecordKey::generate();
        let record = Record::assemble(&key, fields);
        self.store.put(&key, &record).await?;

        Ok(key.id)
    }
}

async fn ensure_complete(session_dir: &Path, expected_count: u32) -> Result<(), AppError> {
    for index in 0..expected_count {
        let slot = SessionDirectoryManager::slot_path(session_dir, index);
        match fs::metadata(&slot).await {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => {
                return Err(AppError::IncompleteUpload {
                    missing_index: index,
                    expected_count,
                })
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(AppError::IncompleteUpload {
                    missing_index: index,
                    expected_count,
                })
            }
            Err(e) => {
                return Err(AppError::MergeError(format!(
                    "cannot inspect fragment {}: {}",
                    index, e
                )))
            }
        }
    }
    Ok(())
}

async fn merge(session_dir: &Path, expected_count: u32) -> Result<Vec<u8>, AppError> {
    let mut merged = Vec::new();
    for index in 0..expected_count {
        let slot = SessionDirectoryManager::slot_path(session_dir, index);
        let bytes = fs::read(&slot)
            .await
            .map_err(|e| AppError::MergeError(format!("cannot read fragment {}: {}", index, e)))?;
        merged.extend_from_slice(&bytes);
    }
    Ok(merged)
}

fn parse_object(bytes: &[u8]) -> Result<Map<String, Value>, AppError> {
    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(other) => Err(AppError::FormatError(format!(
            "expected a JSON object, found {}",
            json_kind(&other)
        ))),
        Err(e) => Err(AppError::FormatError(e.to_string())),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
