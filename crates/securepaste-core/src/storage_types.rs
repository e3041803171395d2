use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Record store backend selected at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// One JSON file per record in a directory
    Local,
    /// Process-local map, nothing survives a restart
    Memory,
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreBackend::Local => write!(f, "local"),
            StoreBackend::Memory => write!(f, "memory"),
        }
    }
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" | "fs" | "filesystem" => Ok(StoreBackend::Local),
            "memory" | "in-memory" => Ok(StoreBackend::Memory),
            other => Err(format!(
                "Invalid store backend: {}. Must be one of: local, memory",
                other
            )),
        }
    }
}
