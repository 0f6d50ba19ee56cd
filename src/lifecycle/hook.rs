//! Hook invocation with panic isolation and a deadline.

use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinError;

use super::lifespan::{AppInfo, HookError, Lifespan};

/// Which notification is being run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Phase {
    Startup,
    Shutdown,
}

impl Phase {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Phase::Startup => "startup",
            Phase::Shutdown => "shutdown",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub(crate) enum HookOutcome {
    Completed,
    Failed(HookError),
    TimedOut(Duration),
    Panicked(String),
}

/// Run one hook on its own task so a panic surfaces as a value.
///
/// The task is aborted if it outlives `limit`.
pub(crate) async fn invoke(
    lifespan: Arc<dyn Lifespan>,
    app: AppInfo,
    phase: Phase,
    limit: Duration,
) -> HookOutcome {
    let mut task = tokio::spawn(async move {
        match phase {
            Phase::Startup => lifespan.startup(&app).await,
            Phase::Shutdown => lifespan.shutdown(&app).await,
        }
    });

    match tokio::time::timeout(limit, &mut task).await {
        Ok(Ok(Ok(()))) => HookOutcome::Completed,
        Ok(Ok(Err(e))) => HookOutcome::Failed(e),
        Ok(Err(join_error)) => HookOutcome::Panicked(panic_message(join_error)),
        Err(_) => {
            task.abort();
            HookOutcome::TimedOut(limit)
        }
    }
}

/// Best-effort text of a task panic.
pub(crate) fn panic_message(error: JoinError) -> String {
    if error.is_cancelled() {
        return "task cancelled".to_string();
    }
    match error.try_into_panic() {
        Ok(payload) => payload_text(payload.as_ref()),
        Err(e) => e.to_string(),
    }
}

fn payload_text(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
