//! Service construction and background tasks

use crate::state::AppState;
use anyhow::{Context, Result};
use securepaste_core::Config;
use securepaste_services::{
    create_record_store, CommitReassembler, DeletionService, FragmentReceiver, IndexService,
    PasteService, SessionDirectoryManager, SessionReaper,
};
use std::sync::Arc;

/// Build the record store, the session directory and every service on top of them
pub async fn initialize_services(config: &Config) -> Result<Arc<AppState>> {
    let store = create_record_store(config)
        .await
        .context("Failed to initialize record store")?;

    let sessions = SessionDirectoryManager::new(config.session_dir().clone())
        .await
        .context("Failed to initialize upload session directory")?;

    tracing::info!(
        store_backend = %store.backend_type(),
        session_dir = %sessions.root().display(),
        max_fragment_bytes = config.upload.max_fragment_bytes,
        max_session_bytes = config.upload.max_session_bytes,
        max_fragments = config.upload.max_fragments,
        "Services initialized"
    );

    Ok(Arc::new(AppState {
        config: config.clone(),
        fragments: FragmentReceiver::new(sessions.clone(), config.upload_limits()),
        commits: CommitReassembler::new(sessions.clone(), store.clone()),
        pastes: PasteService::new(store.clone()),
        index: IndexService::new(store.clone()),
        deletion: DeletionService::new(store.clone()),
        sessions,
        store,
    }))
}

/// Start the session reaper
/// Returns a JoinHandle for graceful shutdown, or `None` when the reaper is disabled
pub fn start_background_tasks(
    config: &Config,
    state: &AppState,
) -> Option<tokio::task::JoinHandle<()>> {
    let reaper = Arc::new(SessionReaper::new(state.sessions.clone(), config.sessions));
    let handle = reaper.start()?;

    tracing::info!(
        ttl_secs = config.session_ttl_secs(),
        interval_secs = config.session_reap_interval_secs(),
        "Session reaper started"
    );

    Some(handle)
}
