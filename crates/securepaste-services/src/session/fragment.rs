use super::manager::SessionDirectoryManager;
use securepaste_core::{AppError, UploadLimits};
use std::io::{ErrorKind, Write};
use std::path::Path;
use tokio::fs;

/// Writes numbered fragments into a session's working directory.
#[derive(Debug, Clone)]
pub struct FragmentReceiver {
    sessions: SessionDirectoryManager,
    limits: UploadLimits,
}

impl FragmentReceiver {
    pub fn new(sessions: SessionDirectoryManager, limits: UploadLimits) -> Self {
        Self { sessions, limits }
    }

    pub fn limits(&self) -> UploadLimits {
        self.limits
    }

    /// Store `payload` in slot `sequence_number`, replacing whatever the slot held.
    pub async fn push(
        &self,
        session_id: &str,
        sequence_number: u32,
        payload: String,
    ) -> Result<(), AppError> {
        let session_dir = self.sessions.ensure_exists(session_id).await?;

        if sequence_number >= self.limits.max_fragments {
            return Err(AppError::InvalidInput(format!(
                "sequence_number must be below {}, got {}",
                self.limits.max_fragments, sequence_number
            )));
        }

        let size = payload.len();
        if size > self.limits.max_fragment_bytes {
            return Err(AppError::PayloadTooLarge(format!(
                "Fragment of {} bytes exceeds the {} byte limit",
                size, self.limits.max_fragment_bytes
            )));
        }

        // Held across the cap check and the write
        let ledger = self.sessions.ledger(session_id);
        let mut stored = ledger.lock().await;
        let total = match *stored {
            Some(total) => total,
            None => self.sessions.slots(session_id).await?.values().sum::<u64>(),
        };

        let slot = SessionDirectoryManager::slot_path(&session_dir, sequence_number);
        let replaced = match fs::metadata(&slot).await {
            Ok(meta) if meta.is_file() => meta.len(),
            Ok(_) => 0,
            Err(e) if e.kind() == ErrorKind::NotFound => 0,
            Err(e) => return Err(AppError::Io(format!("Failed to inspect fragment: {}", e))),
        };
        let projected = total.saturating_sub(replaced) + size as u64;
        if projected > self.limits.max_session_bytes {
            return Err(AppError::PayloadTooLarge(format!(
                "Session would hold {} bytes, above the {} byte limit",
                projected, self.limits.max_session_bytes
            )));
        }

        let written = tokio::task::spawn_blocking(move || {
            write_slot(&session_dir, &slot, payload.as_bytes())
        })
        .await
        .map_err(|e| AppError::Internal(format!("Fragment write task failed: {}", e)))?;

        match written {
            Ok(()) => *stored = Some(projected),
            // Session closed while the fragment was in flight
            Err(e) if e.kind() == ErrorKind::NotFound => {
                drop(stored);
                self.sessions.forget_ledger(session_id);
                return Err(AppError::SessionNotFound(session_id.to_string()));
            }
            Err(e) => {
                // Whether the old slot survived is unknown; rescan on the next push
                *stored = None;
                return Err(AppError::Io(format!("Failed to write fragment: {}", e)));
            }
        }

        tracing::debug!(
            session_id = %session_id,
            sequence_number,
            size_bytes = size,
            "Fragment stored"
        );

        Ok(())
    }
}

/// Temp file plus rename, so a concurrent commit never reads half a fragment.
fn write_slot(session_dir: &Path, slot: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut tmp = tempfile::Builder::new()
        .prefix(".slot-")
        .suffix(".tmp")
        .tempfile_in(session_dir)?;
    tmp.write_all(data)?;
    tmp.persist(slot).map_err(|e| e.error)?;
    Ok(())
}
