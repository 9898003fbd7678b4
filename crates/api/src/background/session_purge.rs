//! Periodic cleanup of expired login sessions.
//!
//! Expired sessions already fail to authenticate; this job only keeps the
//! session table from growing without bound.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use civic_db::Store;
use tokio_util::sync::CancellationToken;

/// Run the session purge loop every `interval` until `cancel` is triggered.
pub async fn run(store: Arc<dyn Store>, interval: Duration, cancel: CancellationToken) {
    tracing::info!(
        interval_secs = interval.as_secs(),
        "Session purge job started"
    );

    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Session purge job stopping");
                break;
            }
            _ = ticker.tick() => {
                match store.purge_expired_sessions(Utc::now()).await {
                    Ok(deleted) if deleted > 0 => {
                        tracing::info!(deleted, "Session purge: removed expired sessions");
                    }
                    Ok(_) => tracing::debug!("Session purge: nothing to remove"),
                    Err(e) => {
                        tracing::error!(error = %e, "Session purge: cleanup failed");
                    }
                }
            }
        }
    }
}
