use crate::traits::{RecentRecords, RecordStore, StorageError, StorageResult};
use crate::StoreBackend;
use async_trait::async_trait;
use securepaste_core::models::{Record, RecordKey};
use securepaste_core::validation::validate_identifier;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Process-local record store, used for tests and throwaway deployments.
///
/// Keys sort numerically, so the map's reverse iteration order is the listing order.
#[derive(Clone, Default)]
pub struct InMemoryRecordStore {
    records: Arc<RwLock<BTreeMap<RecordKey, Record>>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn put(&self, key: &RecordKey, record: &Record) -> StorageResult<()> {
        if record.id != key.id || record.timestamp != key.timestamp {
            return Err(StorageError::InvalidKey(format!(
                "record {}_{} stored under key {}",
                record.timestamp, record.id, key
            )));
        }

        let mut records = self.records.write().await;
        if records.keys().any(|existing| existing.id == key.id) {
            return Err(StorageError::DuplicateId(key.id.clone()));
        }
        records.insert(key.clone(), record.clone());

        tracing::debug!(key = %key, "In-memory record stored");
        Ok(())
    }

    async fn list_recent(&self, limit: usize) -> StorageResult<RecentRecords> {
        let records = self.records.read().await;
        Ok(RecentRecords {
            records: records.values().rev().take(limit).cloned().collect(),
            skipped: 0,
        })
    }

    async fn delete_by_id(&self, id: &str) -> StorageResult<usize> {
        validate_identifier(id).map_err(|e| StorageError::InvalidKey(e.to_string()))?;

        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|key, _| key.id != id);
        let deleted = before - records.len();

        if deleted == 0 {
            return Err(StorageError::NotFound(id.to_string()));
        }

        tracing::debug!(record_id = %id, deleted, "In-memory record deleted");
        Ok(deleted)
    }

    async fn check(&self) -> StorageResult<()> {
        Ok(())
    }

    fn backend_type(&self) -> StoreBackend {
        StoreBackend::Memory
    }
}

#[cfg(all(test, feature = "storage-memory"))]
mod tests {
    use super::*;
    use serde_json::{Map, Value};

    fn record(key: &RecordKey) -> Record {
        let mut fields = Map::new();
        fields.insert("content".to_string(), Value::String("x".to_string()));
        Record::assemble(key, fields)
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let store = InMemoryRecordStore::new();
        for (ts, id) in [(999_999_999, "b"), (1_000_000_000, "a"), (1_000_000_000, "c")] {
            let key = RecordKey::new(ts, id);
            store.put(&key, &record(&key)).await.unwrap();
        }

        let listed = store.list_recent(2).await.unwrap();
        let ids: Vec<&str> = listed.records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a"]);
        assert_eq!(listed.skipped, 0);
    }

    #[tokio::test]
    async fn test_duplicate_id_rejected() {
        let store = InMemoryRecordStore::new();
        let key = RecordKey::new(1, "dup");
        store.put(&key, &record(&key)).await.unwrap();

        let again = RecordKey::new(2, "dup");
        let result = store.put(&again, &record(&again)).await;
        assert!(matches!(result, Err(StorageError::DuplicateId(_))));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_delete() {
        let store = InMemoryRecordStore::new();
        let key = RecordKey::new(1, "gone");
        store.put(&key, &record(&key)).await.unwrap();

        assert_eq!(store.delete_by_id("gone").await.unwrap(), 1);
        assert!(store.is_empty().await);
        assert!(matches!(
            store.delete_by_id("gone").await,
            Err(StorageError::NotFound(_))
        ));
        assert!(matches!(
            store.delete_by_id("../gone").await,
            Err(StorageError::InvalidKey(_))
        ));
    }
}
