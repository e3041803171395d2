//! Validation modules

pub mod identifier;
pub mod remark;

pub use identifier::{validate_identifier, MAX_IDENTIFIER_LENGTH};
pub use remark::{truncate_remark, MAX_REMARK_CHARS};
