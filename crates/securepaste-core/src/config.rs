//! Configuration module
//!
//! Server, storage, upload-limit, and session-expiry settings, read from the environment
//! (with optional `.env` support).

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::storage_types::StoreBackend;

const DEFAULT_PORT: u16 = 8070;
const DEFAULT_DATA_DIR: &str = "data/pastes";
const SESSION_DIR_NAME: &str = "securepaste-sessions";
const MAX_FRAGMENT_BYTES: usize = 8 * 1024 * 1024;
const MAX_SESSION_BYTES: u64 = 64 * 1024 * 1024;
const MAX_FRAGMENTS: u32 = 10_000;
const SESSION_TTL_SECS: u64 = 3600;
const SESSION_REAP_INTERVAL_SECS: u64 = 300;
const MAX_REQUEST_BODY_BYTES: usize = 16 * 1024 * 1024;

/// HTTP server settings
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub max_request_body_bytes: usize,
    /// `text` or `json`
    pub log_format: String,
}

/// Where records and upload sessions live
#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub backend: StoreBackend,
    pub data_dir: PathBuf,
    pub session_dir: PathBuf,
}

/// Resource caps enforced by the fragment receiver
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UploadLimits {
    pub max_fragment_bytes: usize,
    pub max_session_bytes: u64,
    /// Sequence numbers must be strictly below this value
    pub max_fragments: u32,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_fragment_bytes: MAX_FRAGMENT_BYTES,
            max_session_bytes: MAX_SESSION_BYTES,
            max_fragments: MAX_FRAGMENTS,
        }
    }
}

/// Expiry of abandoned upload sessions
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    pub ttl_secs: u64,
    /// 0 = reaper disabled
    pub reap_interval_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_secs: SESSION_TTL_SECS,
            reap_interval_secs: SESSION_REAP_INTERVAL_SECS,
        }
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub upload: UploadLimits,
    pub sessions: SessionConfig,
}

fn env_or<T: FromStr>(key: &str, default: T) -> Result<T, anyhow::Error> {
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map_err(|_| anyhow::anyhow!("{} must be a valid number, got '{}'", key, raw)),
        _ => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins: Vec<String> = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let backend = match env::var("STORE_BACKEND") {
            Ok(raw) => raw.parse::<StoreBackend>().map_err(anyhow::Error::msg)?,
            Err(_) => StoreBackend::Local,
        };

        let data_dir = env::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR));
        let session_dir = env::var("SESSION_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| env::temp_dir().join(SESSION_DIR_NAME));

        let config = Config {
            server: ServerConfig {
                port: env_or("PORT", DEFAULT_PORT)?,
                cors_origins,
                environment,
                max_request_body_bytes: env_or("MAX_REQUEST_BODY_BYTES", MAX_REQUEST_BODY_BYTES)?,
                log_format: env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string()),
            },
            storage: StorageConfig {
                backend,
                data_dir,
                session_dir,
            },
            upload: UploadLimits {
                max_fragment_bytes: env_or("MAX_FRAGMENT_BYTES", MAX_FRAGMENT_BYTES)?,
                max_session_bytes: env_or("MAX_SESSION_BYTES", MAX_SESSION_BYTES)?,
                max_fragments: env_or("MAX_FRAGMENTS", MAX_FRAGMENTS)?,
            },
            sessions: SessionConfig {
                ttl_secs: env_or("SESSION_TTL_SECS", SESSION_TTL_SECS)?,
                reap_interval_secs: env_or("SESSION_REAP_INTERVAL_SECS", SESSION_REAP_INTERVAL_SECS)?,
            },
        };

        Ok(config)
    }

    /// Configuration rooted at explicit directories, everything else at its default.
    pub fn with_dirs(data_dir: impl Into<PathBuf>, session_dir: impl Into<PathBuf>) -> Self {
        Config {
            server: ServerConfig {
                port: DEFAULT_PORT,
                cors_origins: vec!["*".to_string()],
                environment: "development".to_string(),
                max_request_body_bytes: MAX_REQUEST_BODY_BYTES,
                log_format: "text".to_string(),
            },
            storage: StorageConfig {
                backend: StoreBackend::Local,
                data_dir: data_dir.into(),
                session_dir: session_dir.into(),
            },
            upload: UploadLimits::default(),
            sessions: SessionConfig::default(),
        }
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.server.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.is_production() && self.server.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        if self.upload.max_fragment_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_FRAGMENT_BYTES must be greater than 0"));
        }

        if self.upload.max_session_bytes < self.upload.max_fragment_bytes as u64 {
            return Err(anyhow::anyhow!(
                "MAX_SESSION_BYTES ({}) must be at least MAX_FRAGMENT_BYTES ({})",
                self.upload.max_session_bytes,
                self.upload.max_fragment_bytes
            ));
        }

        if self.upload.max_fragments == 0 {
            return Err(anyhow::anyhow!("MAX_FRAGMENTS must be greater than 0"));
        }

        if self.storage.data_dir == self.storage.session_dir {
            return Err(anyhow::anyhow!(
                "DATA_DIR and SESSION_DIR must be different directories"
            ));
        }

        if !matches!(self.server.log_format.as_str(), "text" | "json") {
            return Err(anyhow::anyhow!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.server.log_format
            ));
        }

        Ok(())
    }

    // Convenience getters for common fields
    pub fn server_port(&self) -> u16 {
        self.server.port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.server.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.server.environment
    }

    pub fn store_backend(&self) -> StoreBackend {
        self.storage.backend
    }

    pub fn data_dir(&self) -> &PathBuf {
        &self.storage.data_dir
    }

    pub fn session_dir(&self) -> &PathBuf {
        &self.storage.session_dir
    }

    pub fn upload_limits(&self) -> UploadLimits {
        self.upload
    }

    pub fn session_ttl_secs(&self) -> u64 {
        self.sessions.ttl_secs
    }

    pub fn session_reap_interval_secs(&self) -> u64 {
        self.sessions.reap_interval_secs
    }
}
