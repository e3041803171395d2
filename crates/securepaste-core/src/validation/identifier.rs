//! Identifier validation
//!
//! Session tokens and record identifiers end up as file-system path components, so every
//! identifier arriving from a client is checked here before any path is built from it.

use std::path::{Component, Path};

use crate::error::AppError;

/// Server-issued identifiers are 32 hex characters; anything far longer is rejected outright.
pub const MAX_IDENTIFIER_LENGTH: usize = 128;

/// Validate a client-supplied session or record identifier
///
/// Rules:
/// - Not empty, at most 128 bytes
/// - No `..`, `/`, `\`, platform separator, or NUL
/// - Must be exactly one normal path component (rejects `.` and drive prefixes)
pub fn validate_identifier(id: &str) -> Result<(), AppError> {
    if id.is_empty() {
        return Err(AppError::InvalidIdentifier(
            "identifier cannot be empty".to_string(),
        ));
    }

    if id.len() > MAX_IDENTIFIER_LENGTH {
        return Err(AppError::InvalidIdentifier(format!(
            "identifier exceeds {} bytes",
            MAX_IDENTIFIER_LENGTH
        )));
    }

    if id.contains("..")
        || id.contains('/')
        || id.contains('\\')
        || id.contains(std::path::MAIN_SEPARATOR)
        || id.contains('\0')
    {
        return Err(AppError::InvalidIdentifier(format!(
            "identifier contains path characters: {:?}",
            id
        )));
    }

    let mut components = Path::new(id).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(AppError::InvalidIdentifier(format!(
            "identifier is not a plain name: {:?}",
            id
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_server_issued_tokens() {
        assert!(validate_identifier("3f2b8c1e9d4a4e6b8f0a1c2d3e4f5a6b").is_ok());
        assert!(validate_identifier("legacy-id_42").is_ok());
    }

    #[test]
    fn rejects_traversal_and_separators() {
        for bad in [
            "..",
            "../etc",
            "a..b",
            "a/b",
            "/abs",
            "a\\b",
            ".",
            "",
            "nul\0byte",
        ] {
            let result = validate_identifier(bad);
            assert!(
                matches!(result, Err(AppError::InvalidIdentifier(_))),
                "expected {:?} to be rejected",
                bad
            );
        }
    }

    #[test]
    fn rejects_overlong() {
        let long = "a".repeat(MAX_IDENTIFIER_LENGTH + 1);
        assert!(validate_identifier(&long).is_err());
        let max = "a".repeat(MAX_IDENTIFIER_LENGTH);
        assert!(validate_identifier(&max).is_ok());
    }
}
