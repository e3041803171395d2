//! Stored paste records and their composite storage key.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use uuid::Uuid;

use crate::error::AppError;
use crate::validation::{truncate_remark, validate_identifier};

/// Fields owned by the server. Caller-supplied values under these names are replaced.
pub const RESERVED_FIELDS: &[&str] = &["id", "timestamp"];

/// Composite key `{timestamp}_{id}`.
///
/// Ordering is numeric on the timestamp first, then on the identifier, so keys sort
/// chronologically regardless of how many digits the timestamp has.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordKey {
    pub timestamp: i64,
    pub id: String,
}

impl RecordKey {
    /// Fresh key: current Unix time (seconds) and a random 128-bit identifier.
    pub fn generate() -> Self {
        Self {
            timestamp: Utc::now().timestamp(),
            id: Uuid::new_v4().simple().to_string(),
        }
    }

    pub fn new(timestamp: i64, id: impl Into<String>) -> Self {
        Self {
            timestamp,
            id: id.into(),
        }
    }

    /// Parse `{timestamp}_{id}`. The timestamp must be plain decimal digits and the
    /// identifier must pass [`validate_identifier`].
    pub fn parse(key: &str) -> Result<Self, AppError> {
        let (timestamp, id) = key.split_once('_').ok_or_else(|| {
            AppError::InvalidInput(format!("record key has no separator: {:?}", key))
        })?;

        if timestamp.is_empty() || !timestamp.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AppError::InvalidInput(format!(
                "record key timestamp is not numeric: {:?}",
                key
            )));
        }
        let timestamp = timestamp.parse::<i64>().map_err(|e| {
            AppError::InvalidInput(format!("record key timestamp out of range: {}", e))
        })?;

        validate_identifier(id)?;

        Ok(Self::new(timestamp, id))
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.timestamp, self.id)
    }
}

/// One immutable paste document.
///
/// `id` and `timestamp` are server-assigned; every other field (normally `content`,
/// `is_encrypted`, `remark`) is carried through untouched in `fields`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub timestamp: i64,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Record {
    /// Build a record from caller fields under a server-assigned key.
    ///
    /// Reserved fields in `fields` are dropped and a string `remark` is cut to 50
    /// characters. Nothing is rejected.
    pub fn assemble(key: &RecordKey, mut fields: Map<String, Value>) -> Self {
        for reserved in RESERVED_FIELDS {
            fields.remove(*reserved);
        }

        if let Some(Value::String(remark)) = fields.get_mut("remark") {
            let truncated = truncate_remark(remark);
            if truncated.len() != remark.len() {
                *remark = truncated;
            }
        }

        Self {
            id: key.id.clone(),
            timestamp: key.timestamp,
            fields,
        }
    }

    pub fn key(&self) -> RecordKey {
        RecordKey::new(self.timestamp, self.id.clone())
    }

    /// Records written before remarks existed read back with an empty remark.
    pub fn with_default_remark(mut self) -> Self {
        self.fields
            .entry("remark")
            .or_insert_with(|| Value::String(String::new()));
        self
    }

    pub fn remark(&self) -> &str {
        self.fields
            .get("remark")
            .and_then(Value::as_str)
            .unwrap_or("")
    }

    pub fn is_encrypted(&self) -> bool {
        self.fields
            .get("is_encrypted")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub fn content(&self) -> Option<&Value> {
        self.fields.get("content")
    }
}
