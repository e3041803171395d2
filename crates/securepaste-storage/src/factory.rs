#[cfg(feature = "storage-local")]
use crate::LocalRecordStore;
#[cfg(feature = "storage-memory")]
use crate::InMemoryRecordStore;
#[cfg(not(all(feature = "storage-local", feature = "storage-memory")))]
use crate::StorageError;
use crate::{RecordStore, StorageResult, StoreBackend};
use securepaste_core::Config;
use std::sync::Arc;

/// Create a record store based on configuration
pub async fn create_record_store(config: &Config) -> StorageResult<Arc<dyn RecordStore>> {
    match config.store_backend() {
        #[cfg(feature = "storage-local")]
        StoreBackend::Local => {
            let store = LocalRecordStore::new(config.data_dir().clone()).await?;
            tracing::info!(path = %config.data_dir().display(), "Using local record store");
            Ok(Arc::new(store))
        }

        #[cfg(not(feature = "storage-local"))]
        StoreBackend::Local => Err(StorageError::ConfigError(
            "Local record store not available (storage-local feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-memory")]
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory record store; records are lost on restart");
            Ok(Arc::new(InMemoryRecordStore::new()))
        }

        #[cfg(not(feature = "storage-memory"))]
        StoreBackend::Memory => Err(StorageError::ConfigError(
            "In-memory record store not available (storage-memory feature not enabled)".to_string(),
        )),
    }
}

#[cfg(all(test, feature = "storage-local", feature = "storage-memory"))]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_creates_configured_backend() {
        let dir = tempdir().unwrap();
        let mut config = Config::with_dirs(dir.path().join("pastes"), dir.path().join("sessions"));

        let store = create_record_store(&config).await.unwrap();
        assert_eq!(store.backend_type(), StoreBackend::Local);
        assert!(dir.path().join("pastes").is_dir());

        config.storage.backend = StoreBackend::Memory;
        let store = create_record_store(&config).await.unwrap();
        assert_eq!(store.backend_type(), StoreBackend::Memory);
    }
}
