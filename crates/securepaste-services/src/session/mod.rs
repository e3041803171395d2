//! Upload sessions: one working directory per session, one slot file per fragment.

mod fragment;
mod manager;

pub use fragment::FragmentReceiver;
pub use manager::SessionDirectoryManager;
