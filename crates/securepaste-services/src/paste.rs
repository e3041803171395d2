use securepaste_core::models::{NewPaste, Record, RecordKey};
use securepaste_core::AppError;
use securepaste_storage::RecordStore;
use std::sync::Arc;

/// Single-request paste creation, for documents small enough to skip the upload session.
#[derive(Clone)]
pub struct PasteService {
    store: Arc<dyn RecordStore>,
}

impl PasteService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Store `paste` as a new record and return its id.
    pub async fn create(&self, paste: NewPaste) -> Result<String, AppError> {
        let is_encrypted = paste.is_encrypted;
        let key = RecordKey::generate();
        let record = Record::assemble(&key, paste.into_fields()?);
        self.store.put(&key, &record).await?;

        tracing::info!(
            record_id = %key.id,
            timestamp = key.timestamp,
            is_encrypted,
            "Paste created"
        );

        Ok(key.id)
    }
}
