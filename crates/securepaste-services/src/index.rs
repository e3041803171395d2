use securepaste_core::models::Record;
use securepaste_core::AppError;
use securepaste_storage::RecordStore;
use std::sync::Arc;

/// Hard cap on the number of records a listing returns.
pub const LIST_LIMIT: usize = 200;

/// Reverse-chronological index over the record store.
#[derive(Clone)]
pub struct IndexService {
    store: Arc<dyn RecordStore>,
}

impl IndexService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// The newest [`LIST_LIMIT`] records.
    pub async fn list(&self) -> Result<Vec<Record>, AppError> {
        self.list_limited(LIST_LIMIT).await
    }

    /// The newest `limit` records; `limit` is clamped to [`LIST_LIMIT`].
    pub async fn list_limited(&self, limit: usize) -> Result<Vec<Record>, AppError> {
        let listing = self.store.list_recent(limit.min(LIST_LIMIT)).await?;

        if listing.skipped > 0 {
            tracing::warn!(
                skipped = listing.skipped,
                returned = listing.records.len(),
                "Skipped unreadable records while listing"
            );
        }

        Ok(listing
            .records
            .into_iter()
            .map(Record::with_default_remark)
            .collect())
    }
}
