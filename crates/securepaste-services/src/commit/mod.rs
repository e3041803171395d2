//! Reassembly of uploaded fragments into a stored record.

mod service;

pub use service::CommitReassembler;
