use securepaste_core::validation::validate_identifier;
use securepaste_core::AppError;
use securepaste_storage::RecordStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct DeletionService {
    store: Arc<dyn RecordStore>,
}

impl DeletionService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Remove every record stored under `id`; returns how many were removed.
    pub async fn delete(&self, id: &str) -> Result<usize, AppError> {
        validate_identifier(id)?;

        let deleted_count = self.store.delete_by_id(id).await?;
        tracing::info!(record_id = %id, deleted_count, "Record deleted");

        Ok(deleted_count)
    }
}
