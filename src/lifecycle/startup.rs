//! Startup notification.
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The hook runs before the listener is handed to the server, so no
//!   request can be served on failure
//! - A hook that hangs is bounded by `startup_timeout_secs`

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use super::hook::{self, HookOutcome, Phase};
use super::lifespan::{AppInfo, HookError, Lifespan};

/// The startup notification did not complete; the application never became available.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("startup notification failed: {0}")]
    Failed(#[source] HookError),

    #[error("startup notification timed out after {0:?}")]
    TimedOut(Duration),

    #[error("startup notification panicked: {0}")]
    Panicked(String),
}

/// Run the startup hook once.
pub(crate) async fn notify_startup(
    lifespan: &Arc<dyn Lifespan>,
    app: &AppInfo,
    limit: Duration,
) -> Result<(), StartupError> {
    match hook::invoke(Arc::clone(lifespan), app.clone(), Phase::Startup, limit).await {
        HookOutcome::Completed => Ok(()),
        HookOutcome::Failed(e) => Err(StartupError::Failed(e)),
        HookOutcome::TimedOut(limit) => Err(StartupError::TimedOut(limit)),
        HookOutcome::Panicked(msg) => Err(StartupError::Panicked(msg)),
    }
}
