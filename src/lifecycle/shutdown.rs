//! Shutdown coordination and the shutdown notification.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::watch;

use super::hook::{self, HookOutcome, Phase};
use super::lifespan::{AppInfo, HookError, Lifespan};

/// Coordinator for graceful shutdown.
///
/// The trigger is sticky: a task that starts waiting after `trigger` has
/// been called still sees it. Clones share the same flag, so a clone can be
/// handed to whatever owns the termination decision.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: Arc<watch::Sender<bool>>,
}

impl Shutdown {
    /// Create a new shutdown coordinator.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Subscribe to the shutdown flag.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }

    /// Trigger the shutdown signal. Later calls are no-ops.
    pub fn trigger(&self) {
        self.tx.send_if_modified(|triggered| !std::mem::replace(triggered, true));
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolve once `trigger` has been called, including before this call.
    pub async fn triggered(&self) {
        let mut rx = self.subscribe();
        // The sender lives as long as `self`.
        let _ = rx.wait_for(|triggered| *triggered).await;
    }

    /// Get the number of active subscribers.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// The shutdown notification did not complete cleanly.
///
/// Never fatal: the lifecycle still reaches `Stopped`.
#[derive(Debug, Error)]
pub enum ShutdownError {
    #[error("shutdown notification failed: {0}")]
    Failed(#[source] HookError),

    #[error("shutdown notification timed out after {0:?}")]
    TimedOut(Duration),

    #[error("shutdown notification panicked: {0}")]
    Panicked(String),
}

/// Run the shutdown hook once.
pub(crate) async fn notify_shutdown(
    lifespan: &Arc<dyn Lifespan>,
    app: &AppInfo,
    limit: Duration,
) -> Result<(), ShutdownError> {
    match hook::invoke(Arc::clone(lifespan), app.clone(), Phase::Shutdown, limit).await {
        HookOutcome::Completed => Ok(()),
        HookOutcome::Failed(e) => Err(ShutdownError::Failed(e)),
        HookOutcome::TimedOut(limit) => Err(ShutdownError::TimedOut(limit)),
        HookOutcome::Panicked(msg) => Err(ShutdownError::Panicked(msg)),
    }
}
