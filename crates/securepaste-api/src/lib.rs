//! SecurePaste API Library
//!
//! This crate provides the HTTP handlers, error rendering, and application setup.

mod handlers;
mod telemetry;

pub mod error;
pub mod setup;
pub mod state;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
