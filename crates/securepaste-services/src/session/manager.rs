use securepaste_core::models::UploadProgress;
use securepaste_core::validation::validate_identifier;
use securepaste_core::AppError;
use std::collections::{BTreeMap, HashMap};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};
use tokio::fs;
use uuid::Uuid;

/// Directory name prefix of a session being committed.
const CLAIM_PREFIX: &str = ".committing-";

/// Bytes held by one session's fragments. `None` until the first push loads it from disk.
pub(crate) type ByteLedger = Arc<tokio::sync::Mutex<Option<u64>>>;

/// Owns the per-session working directories under one root.
///
/// Layout: `{root}/{session_id}/{sequence_number}`. Every method taking a `session_id`
/// validates it before a path is built from it.
///
/// Fragment pushes to one session are serialized through its byte ledger, so the session
/// byte cap holds under concurrent requests without rescanning the directory.
#[derive(Debug, Clone)]
pub struct SessionDirectoryManager {
    root: PathBuf,
    ledgers: Arc<Mutex<HashMap<String, ByteLedger>>>,
}

impl SessionDirectoryManager {
    pub async fn new(root: impl Into<PathBuf>) -> Result<Self, AppError> {
        let root = root.into();
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::Io(format!(
                "Failed to create session directory {}: {}",
                root.display(),
                e
            ))
        })?;
        Ok(Self {
            root,
            ledgers: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn session_path(&self, session_id: &str) -> PathBuf {
        self.root.join(session_id)
    }

    /// Slot file of one fragment. `session_id` must already be validated.
    pub(crate) fn slot_path(session_dir: &Path, sequence_number: u32) -> PathBuf {
        session_dir.join(sequence_number.to_string())
    }

    /// Start a new session with an empty, exclusively owned working directory.
    pub async fn open(&self) -> Result<String, AppError> {
        let session_id = Uuid::new_v4().simple().to_string();
        let path = self.session_path(&session_id);

        // create_dir (not create_dir_all) fails if the directory is already there
        fs::create_dir(&path).await.map_err(|e| {
            AppError::Io(format!(
                "Failed to create working directory for session {}: {}",
                session_id, e
            ))
        })?;

        tracing::info!(session_id = %session_id, "Upload session opened");
        Ok(session_id)
    }

    /// Lock guarding the byte total of `session_id`. `session_id` must already be validated.
    pub(crate) fn ledger(&self, session_id: &str) -> ByteLedger {
        let mut ledgers = self
            .ledgers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        ledgers.entry(session_id.to_string()).or_default().clone()
    }

    pub(crate) fn forget_ledger(&self, session_id: &str) {
        let mut ledgers = self
            .ledgers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        ledgers.remove(session_id);
    }

    /// Take exclusive ownership of a session for commit.
    ///
    /// The working directory is renamed out of the live namespace, so exactly one caller wins
    /// and every later push, commit or progress query sees session-not-found. The returned
    /// directory must be removed with [`Self::release_claim`].
    pub(crate) async fn claim(&self, session_id: &str) -> Result<PathBuf, AppError> {
        let live = self.ensure_exists(session_id).await?;
        let claimed = self.root.join(format!("{}{}", CLAIM_PREFIX, session_id));

        fs::rename(&live, &claimed).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => AppError::SessionNotFound(session_id.to_string()),
            _ => AppError::Io(format!("Failed to claim session {}: {}", session_id, e)),
        })?;
        self.forget_ledger(session_id);

        Ok(claimed)
    }

    pub(crate) async fn release_claim(&self, claimed: &Path) -> Result<(), AppError> {
        match fs::remove_dir_all(claimed).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Io(format!(
                "Failed to remove {}: {}",
                claimed.display(),
                e
            ))),
        }
    }

    /// Remove the session and everything in it. Closing an unknown session is a no-op.
    pub async fn close(&self, session_id: &str) -> Result<(), AppError> {
        validate_identifier(session_id)?;
        self.forget_ledger(session_id);
        let path = self.session_path(session_id);

        match fs::remove_dir_all(&path).await {
            Ok(()) => {
                tracing::debug!(session_id = %session_id, "Upload session closed");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Io(format!(
                "Failed to remove working directory for session {}: {}",
                session_id, e
            ))),
        }
    }

    /// Working directory of a live session.
    pub async fn ensure_exists(&self, session_id: &str) -> Result<PathBuf, AppError> {
        validate_identifier(session_id)?;
        if session_id.starts_with(CLAIM_PREFIX) {
            return Err(AppError::SessionNotFound(session_id.to_string()));
        }
        let path = self.session_path(session_id);

        match fs::metadata(&path).await {
            Ok(meta) if meta.is_dir() => Ok(path),
            Ok(_) => Err(AppError::SessionNotFound(session_id.to_string())),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(AppError::SessionNotFound(session_id.to_string()))
            }
            Err(e) => Err(AppError::Io(format!(
                "Failed to inspect session {}: {}",
                session_id, e
            ))),
        }
    }

    /// Sizes of the fragments currently present, keyed by sequence number.
    pub(crate) async fn slots(&self, session_id: &str) -> Result<BTreeMap<u32, u64>, AppError> {
        let dir = self.ensure_exists(session_id).await?;
        let mut entries = fs::read_dir(&dir).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => AppError::SessionNotFound(session_id.to_string()),
            _ => AppError::Io(format!("Failed to read session {}: {}", session_id, e)),
        })?;

        let mut slots = BTreeMap::new();
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            let Some(sequence_number) = name.to_str().and_then(parse_slot_name) else {
                continue;
            };
            match entry.metadata().await {
                Ok(meta) if meta.is_file() => {
                    slots.insert(sequence_number, meta.len());
                }
                Ok(_) => {}
                // Overwritten or removed while scanning
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }

        Ok(slots)
    }

    /// Which fragments have arrived so far, and how many bytes they hold.
    pub async fn received(&self, session_id: &str) -> Result<UploadProgress, AppError> {
        let slots = self.slots(session_id).await?;
        Ok(UploadProgress {
            session_id: session_id.to_string(),
            received_bytes: slots.values().sum(),
            received: slots.into_keys().collect(),
        })
    }

    /// Sessions whose working directory has not been modified for at least `ttl`.
    ///
    /// Leftovers of interrupted commits are reported under their claimed name.
    pub async fn expired_sessions(&self, ttl: Duration) -> Result<Vec<String>, AppError> {
        let now = SystemTime::now();
        let mut entries = fs::read_dir(&self.root).await?;
        let mut expired = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let Some(session_id) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if validate_identifier(&session_id).is_err() {
                continue;
            }

            let modified = match entry.metadata().await {
                Ok(meta) if meta.is_dir() => meta.modified(),
                Ok(_) => continue,
                Err(e) => Err(e),
            };
            match modified {
                Ok(modified) => {
                    // A clock step backwards makes the directory look fresh
                    let age = now.duration_since(modified).unwrap_or_default();
                    if age >= ttl {
                        expired.push(session_id);
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, session_id = %session_id, "Cannot read session age");
                }
            }
        }

        Ok(expired)
    }

    /// Cheap check used by health checks
    pub async fn check(&self) -> Result<(), AppError> {
        let meta = fs::metadata(&self.root).await?;
        if !meta.is_dir() {
            return Err(AppError::Io(format!(
                "{} is not a directory",
                self.root.display()
            )));
        }
        Ok(())
    }
}

/// Slot files are named by the canonical decimal sequence number; anything else (temp files,
/// `007`) is not a fragment.
fn parse_slot_name(name: &str) -> Option<u32> {
    let n = name.parse::<u32>().ok()?;
    (n.to_string() == name).then_some(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_open_creates_unique_directories() {
        let dir = tempdir().unwrap();
        let manager = SessionDirectoryManager::new(dir.path()).await.unwrap();

        let a = manager.open().await.unwrap();
        let b = manager.open().await.unwrap();
        assert_ne!(a, b);
        assert_eq!(a.len(), 32);
        assert!(dir.path().join(&a).is_dir());
        assert!(dir.path().join(&b).is_dir());
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let dir = tempdir().unwrap();
        let manager = SessionDirectoryManager::new(dir.path()).await.unwrap();
        let session_id = manager.open().await.unwrap();
        std::fs::write(dir.path().join(&session_id).join("0"), b"data").unwrap();

        manager.close(&session_id).await.unwrap();
        assert!(!dir.path().join(&session_id).exists());
        manager.close(&session_id).await.unwrap();
    }

    #[tokio::test]
    async fn test_close_rejects_traversal() {
        let dir = tempdir().unwrap();
        let manager = SessionDirectoryManager::new(dir.path().join("sessions"))
            .await
            .unwrap();
        std::fs::create_dir(dir.path().join("victim")).unwrap();

        let result = manager.close("../victim").await;
        assert!(matches!(result, Err(AppError::InvalidIdentifier(_))));
        assert!(dir.path().join("victim").is_dir());
    }

    #[tokio::test]
    async fn test_ensure_exists() {
        let dir = tempdir().unwrap();
        let manager = SessionDirectoryManager::new(dir.path()).await.unwrap();
        let session_id = manager.open().await.unwrap();

        assert_eq!(
            manager.ensure_exists(&session_id).await.unwrap(),
            dir.path().join(&session_id)
        );
        assert!(matches!(
            manager.ensure_exists("0123456789abcdef").await,
            Err(AppError::SessionNotFound(_))
        ));
        assert!(matches!(
            manager.ensure_exists("a/b").await,
            Err(AppError::InvalidIdentifier(_))
        ));
    }

    #[tokio::test]
    async fn test_received_lists_slots_in_order() {
        let dir = tempdir().unwrap();
        let manager = SessionDirectoryManager::new(dir.path()).await.unwrap();
        let session_id = manager.open().await.unwrap();
        let session_dir = dir.path().join(&session_id);
        std::fs::write(session_dir.join("10"), b"abc").unwrap();
        std::fs::write(session_dir.join("2"), b"de").unwrap();
        std::fs::write(session_dir.join("007"), b"ignored").unwrap();
        std::fs::write(session_dir.join(".slot-x.tmp"), b"ignored").unwrap();

        let progress = manager.received(&session_id).await.unwrap();
        assert_eq!(progress.session_id, session_id);
        assert_eq!(progress.received, vec![2, 10]);
        assert_eq!(progress.received_bytes, 5);
    }

    #[tokio::test]
    async fn test_expired_sessions() {
        let dir = tempdir().unwrap();
        let manager = SessionDirectoryManager::new(dir.path()).await.unwrap();
        let session_id = manager.open().await.unwrap();
        std::fs::write(dir.path().join("stray-file"), b"x").unwrap();

        let fresh = manager
            .expired_sessions(Duration::from_secs(3600))
            .await
            .unwrap();
        assert!(fresh.is_empty());

        let stale = manager.expired_sessions(Duration::ZERO).await.unwrap();
        assert_eq!(stale, vec![session_id]);
    }

    #[tokio::test]
    async fn test_claim_is_exclusive() {
        let dir = tempdir().unwrap();
        let manager = SessionDirectoryManager::new(dir.path()).await.unwrap();
        let session_id = manager.open().await.unwrap();
        std::fs::write(dir.path().join(&session_id).join("0"), b"{}").unwrap();

        let claimed = manager.claim(&session_id).await.unwrap();
        assert!(claimed.join("0").is_file());
        assert!(matches!(
            manager.claim(&session_id).await,
            Err(AppError::SessionNotFound(_))
        ));
        assert!(matches!(
            manager.ensure_exists(&session_id).await,
            Err(AppError::SessionNotFound(_))
        ));

        // The claimed name is not addressable as a session
        let claimed_name = claimed.file_name().unwrap().to_str().unwrap().to_string();
        assert!(matches!(
            manager.ensure_exists(&claimed_name).await,
            Err(AppError::SessionNotFound(_))
        ));

        manager.release_claim(&claimed).await.unwrap();
        assert!(!claimed.exists());
    }

    #[tokio::test]
    async fn test_interrupted_commit_is_reaped() {
        let dir = tempdir().unwrap();
        let manager = SessionDirectoryManager::new(dir.path()).await.unwrap();
        let session_id = manager.open().await.unwrap();
        let claimed = manager.claim(&session_id).await.unwrap();

        let stale = manager.expired_sessions(Duration::ZERO).await.unwrap();
        assert_eq!(stale.len(), 1);
        manager.close(&stale[0]).await.unwrap();
        assert!(!claimed.exists());
    }

    #[test]
    fn test_parse_slot_name() {
        assert_eq!(parse_slot_name("0"), Some(0));
        assert_eq!(parse_slot_name("42"), Some(42));
        assert_eq!(parse_slot_name("042"), None);
        assert_eq!(parse_slot_name("+1"), None);
        assert_eq!(parse_slot_name(".slot-1.tmp"), None);
    }
}
