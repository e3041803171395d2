//! SecurePaste Core Library
//!
//! This crate provides the domain models, error types, configuration, and identifier
//! validation shared across all SecurePaste components.

pub mod config;
pub mod error;
pub mod models;
pub mod storage_types;
pub mod validation;

// Re-export commonly used types
pub use config::{Config, ServerConfig, SessionConfig, StorageConfig, UploadLimits};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use storage_types::StoreBackend;
