//! Shared application state handed to every handler.

use securepaste_core::Config;
use securepaste_services::{
    CommitReassembler, DeletionService, FragmentReceiver, IndexService, PasteService,
    RecordStore, SessionDirectoryManager,
};
use std::sync::Arc;

pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn RecordStore>,
    pub sessions: SessionDirectoryManager,
    pub fragments: FragmentReceiver,
    pub commits: CommitReassembler,
    pub pastes: PasteService,
    pub index: IndexService,
    pub deletion: DeletionService,
}
