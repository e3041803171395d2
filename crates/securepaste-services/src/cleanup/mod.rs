//! Expiry of abandoned upload sessions.

mod service;

pub use service::SessionReaper;
