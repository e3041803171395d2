use crate::keys;
use crate::traits::{RecentRecords, RecordStore, StorageError, StorageResult};
use crate::StoreBackend;
use async_trait::async_trait;
use securepaste_core::models::{Record, RecordKey};
use securepaste_core::validation::validate_identifier;
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Prefix of in-flight files; they never end in `.json`, so listings skip them.
const TEMP_PREFIX: &str = ".incoming-";

/// Local filesystem record store: one `{timestamp}_{id}.json` file per record.
#[derive(Clone)]
pub struct LocalRecordStore {
    base_path: PathBuf,
}

impl LocalRecordStore {
    /// Create a new LocalRecordStore instance
    ///
    /// # Arguments
    /// * `base_path` - Directory holding the record files (e.g., "data/pastes")
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create record directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalRecordStore { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn record_path(&self, key: &RecordKey) -> PathBuf {
        self.base_path.join(keys::file_name(key))
    }

    /// All record keys in the directory, plus the number of `.json` entries whose name is
    /// not a valid record key.
    async fn scan_keys(&self) -> StorageResult<(Vec<RecordKey>, usize)> {
        let mut entries = fs::read_dir(&self.base_path).await?;
        let mut found = Vec::new();
        let mut malformed = 0usize;

        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if !name.ends_with(keys::RECORD_EXTENSION) {
                continue;
            }
            match keys::parse_file_name(name) {
                Some(key) => found.push(key),
                None => {
                    malformed += 1;
                    tracing::debug!(file = %name, "Ignoring file with malformed record name");
                }
            }
        }

        Ok((found, malformed))
    }

    async fn find_by_id(&self, id: &str) -> StorageResult<Vec<RecordKey>> {
        let (found, _) = self.scan_keys().await?;
        Ok(found.into_iter().filter(|key| key.id == id).collect())
    }
}

/// Write `data` to a temp file next to `target`, sync it, then move it into place.
///
/// The final rename refuses to replace an existing file, so a key is created at most once.
fn write_atomically(dir: &Path, target: &Path, data: &[u8]) -> StorageResult<()> {
    let mut tmp = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|e| {
            StorageError::WriteFailed(format!(
                "Failed to create temp file in {}: {}",
                dir.display(),
                e
            ))
        })?;

    tmp.write_all(data).map_err(|e| {
        StorageError::WriteFailed(format!(
            "Failed to write temp file {}: {}",
            tmp.path().display(),
            e
        ))
    })?;

    tmp.as_file().sync_all().map_err(|e| {
        StorageError::WriteFailed(format!(
            "Failed to sync temp file {}: {}",
            tmp.path().display(),
            e
        ))
    })?;

    tmp.persist_noclobber(target).map_err(|e| {
        if e.error.kind() == std::io::ErrorKind::AlreadyExists {
            StorageError::DuplicateId(target.display().to_string())
        } else {
            StorageError::WriteFailed(format!(
                "Failed to move record into place at {}: {}",
                target.display(),
                e.error
            ))
        }
    })?;

    Ok(())
}

#[async_trait]
impl RecordStore for LocalRecordStore {
    async fn put(&self, key: &RecordKey, record: &Record) -> StorageResult<()> {
        if record.id != key.id || record.timestamp != key.timestamp {
            return Err(StorageError::InvalidKey(format!(
                "record {}_{} stored under key {}",
                record.timestamp, record.id, key
            )));
        }

        if !self.find_by_id(&key.id).await?.is_empty() {
            return Err(StorageError::DuplicateId(key.id.clone()));
        }

        let data = serde_json::to_vec_pretty(record)
            .map_err(|e| StorageError::WriteFailed(format!("Failed to serialize record: {}", e)))?;
        let size = data.len();
        let path = self.record_path(key);
        let start = std::time::Instant::now();

        let dir = self.base_path.clone();
        let target = path.clone();
        tokio::task::spawn_blocking(move || write_atomically(&dir, &target, &data))
            .await
            .map_err(|e| StorageError::BackendError(format!("Record write task failed: {}", e)))??;

        tracing::info!(
            path = %path.display(),
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local record write successful"
        );

        Ok(())
    }

    async fn list_recent(&self, limit: usize) -> StorageResult<RecentRecords> {
        let start = std::time::Instant::now();
        let (mut found, mut skipped) = self.scan_keys().await?;
        let total = found.len();

        found.sort_unstable_by(|a, b| b.cmp(a));
        found.truncate(limit);

        let mut records = Vec::with_capacity(found.len());
        for key in found {
            let path = self.record_path(&key);
            let bytes = match fs::read(&path).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    // Deleted between the directory scan and the read, or unreadable
                    skipped += 1;
                    tracing::debug!(error = %e, path = %path.display(), "Skipping unreadable record");
                    continue;
                }
            };
            match serde_json::from_slice::<Record>(&bytes) {
                Ok(record) => records.push(record),
                Err(e) => {
                    skipped += 1;
                    tracing::warn!(error = %e, path = %path.display(), "Skipping corrupt record");
                }
            }
        }

        tracing::debug!(
            total,
            returned = records.len(),
            skipped,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local record listing complete"
        );

        Ok(RecentRecords { records, skipped })
    }

    async fn delete_by_id(&self, id: &str) -> StorageResult<usize> {
        validate_identifier(id).map_err(|e| StorageError::InvalidKey(e.to_string()))?;

        let matches = self.find_by_id(id).await?;
        if matches.is_empty() {
            return Err(StorageError::NotFound(id.to_string()));
        }

        let mut deleted = 0usize;
        for key in &matches {
            let path = self.record_path(key);
            match fs::remove_file(&path).await {
                Ok(()) => deleted += 1,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    tracing::debug!(path = %path.display(), "Record already removed");
                }
                Err(e) => {
                    return Err(StorageError::DeleteFailed(format!(
                        "Failed to delete file {}: {}",
                        path.display(),
                        e
                    )));
                }
            }
        }

        if deleted == 0 {
            return Err(StorageError::NotFound(id.to_string()));
        }

        if deleted > 1 {
            tracing::warn!(record_id = %id, deleted, "Several records shared one identifier");
        }

        tracing::info!(record_id = %id, deleted, "Local record delete successful");

        Ok(deleted)
    }

    async fn check(&self) -> StorageResult<()> {
        let meta = fs::metadata(&self.base_path).await?;
        if !meta.is_dir() {
            return Err(StorageError::ConfigError(format!(
                "{} is not a directory",
                self.base_path.display()
            )));
        }
        Ok(())
    }

    fn backend_type(&self) -> StoreBackend {
        StoreBackend::Local
    }
}
