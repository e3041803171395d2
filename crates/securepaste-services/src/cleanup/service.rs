use crate::session::SessionDirectoryManager;
use securepaste_core::{AppError, SessionConfig};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;

/// Removes upload sessions nobody committed or aborted.
///
/// A session's age is the last modification time of its working directory, which every
/// fragment write refreshes.
#[derive(Clone)]
pub struct SessionReaper {
    sessions: SessionDirectoryManager,
    ttl: Duration,
    reap_interval: Duration,
}

impl SessionReaper {
    pub fn new(sessions: SessionDirectoryManager, config: SessionConfig) -> Self {
        Self {
            sessions,
            ttl: Duration::from_secs(config.ttl_secs),
            reap_interval: Duration::from_secs(config.reap_interval_secs),
        }
    }

    /// Start the background sweep and return its JoinHandle for graceful shutdown.
    /// Returns `None` when the interval is zero (disabled).
    pub fn start(self: Arc<Self>) -> Option<tokio::task::JoinHandle<()>> {
        if self.reap_interval.is_zero() {
            tracing::info!("Session reaper disabled");
            return None;
        }

        Some(tokio::spawn(async move {
            let mut reap_interval = interval(self.reap_interval);

            loop {
                reap_interval.tick().await;

                match self.sweep().await {
                    Ok(0) => tracing::debug!("No expired upload sessions"),
                    Ok(removed) => tracing::info!(removed, "Expired upload sessions removed"),
                    Err(e) => tracing::error!(error = %e, "Session sweep failed"),
                }
            }
        }))
    }

    /// One pass over the session root; returns how many sessions were removed.
    pub async fn sweep(&self) -> Result<usize, AppError> {
        self.sweep_older_than(self.ttl).await
    }

    /// One pass with an explicit TTL instead of the configured one.
    #[tracing::instrument(skip(self), fields(cleanup.operation = "expire_sessions"))]
    pub async fn sweep_older_than(&self, ttl: Duration) -> Result<usize, AppError> {
        let expired = self.sessions.expired_sessions(ttl).await?;
        let mut removed = 0usize;

        for session_id in expired {
            match self.sessions.close(&session_id).await {
                Ok(()) => {
                    removed += 1;
                    tracing::debug!(session_id = %session_id, "Removed expired upload session");
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        session_id = %session_id,
                        "Failed to remove expired upload session, continuing"
                    );
                }
            }
        }

        Ok(removed)
    }
}
