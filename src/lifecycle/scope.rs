//! Scoped lifecycle: startup → available → shutdown.
//!
//! # Responsibilities
//! - Run the startup notification exactly once before the available period
//! - Run the available period on its own task
//! - Run the shutdown notification exactly once after it, on every exit path
//!
//! # Design Decisions
//! - Startup failure is fatal and skips both the available period and shutdown
//! - Shutdown failure is logged and counted, never returned
//! - Panics in the available period are caught at the task boundary

use std::future::Future;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::task::JoinHandle;

use super::hook::{panic_message, Phase};
use super::lifespan::{AppInfo, Lifespan};
use super::shutdown::notify_shutdown;
use super::startup::{notify_startup, StartupError};
use super::state::{LifecycleState, StateHandle};
use crate::config::LifecycleConfig;
use crate::observability::metrics;

/// Why a lifecycle run did not end cleanly.
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error(transparent)]
    Startup(#[from] StartupError),

    #[error("serving failed: {0}")]
    Serve(#[from] io::Error),

    #[error("available period panicked: {0}")]
    Panicked(String),
}

/// Runs one application lifecycle around a caller-supplied available period.
pub struct Lifecycle {
    app: AppInfo,
    lifespan: Arc<dyn Lifespan>,
    state: StateHandle,
    config: LifecycleConfig,
}

impl Lifecycle {
    pub fn new(
        app: AppInfo,
        lifespan: Arc<dyn Lifespan>,
        state: StateHandle,
        config: LifecycleConfig,
    ) -> Self {
        Self {
            app,
            lifespan,
            state,
            config,
        }
    }

    pub fn state(&self) -> &StateHandle {
        &self.state
    }

    /// Acquire the available state, run `available`, then release it.
    ///
    /// Returns the outcome of `available` once the shutdown notification has
    /// run and the state is `Stopped`. If the returned future is dropped
    /// while the available period is still running, the available period is
    /// aborted and the shutdown notification does not run.
    pub async fn scope<F, T>(&self, available: F) -> Result<T, LifecycleError>
    where
        F: Future<Output = io::Result<T>> + Send + 'static,
        T: Send + 'static,
    {
        let startup_limit = Duration::from_secs(self.config.startup_timeout_secs);
        if let Err(e) = notify_startup(&self.lifespan, &self.app, startup_limit).await {
            metrics::record_hook_failure(Phase::Startup.as_str());
            tracing::error!(title = %self.app.title, error = %e, "Startup failed, not serving");
            self.state.advance(LifecycleState::Stopped);
            return Err(e.into());
        }

        self.state.advance(LifecycleState::Available);

        let mut task = AbortOnDrop(tokio::spawn(available));
        let outcome = match (&mut task.0).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                tracing::error!(error = %e, "Available period ended with an error");
                Err(LifecycleError::Serve(e))
            }
            Err(join_error) => {
                let msg = panic_message(join_error);
                tracing::error!(panic = %msg, "Available period panicked");
                Err(LifecycleError::Panicked(msg))
            }
        };

        // The signal path may already have moved to Stopping.
        self.state.advance(LifecycleState::Stopping);

        let shutdown_limit = Duration::from_secs(self.config.shutdown_timeout_secs);
        if let Err(e) = notify_shutdown(&self.lifespan, &self.app, shutdown_limit).await {
            metrics::record_hook_failure(Phase::Shutdown.as_str());
            tracing::error!(title = %self.app.title, error = %e, "Shutdown notification failed");
        }

        self.state.advance(LifecycleState::Stopped);
        outcome
    }
}

/// Aborts the wrapped task when dropped.
struct AbortOnDrop<T>(JoinHandle<T>);

impl<T> Drop for AbortOnDrop<T> {
    fn drop(&mut self) {
        self.0.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::lifespan::HookError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<&'static str>>,
        fail_startup: bool,
        fail_shutdown: bool,
    }

    impl Recorder {
        fn events(&self) -> Vec<&'static str> {
            self.events.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Lifespan for Recorder {
        async fn startup(&self, _app: &AppInfo) -> Result<(), HookError> {
            self.events.lock().unwrap().push("startup");
            if self.fail_startup {
                return Err("startup refused".into());
            }
            Ok(())
        }

        async fn shutdown(&self, _app: &AppInfo) -> Result<(), HookError> {
            self.events.lock().unwrap().push("shutdown");
            if self.fail_shutdown {
                return Err("cleanup failed".into());
            }
            Ok(())
        }
    }

    fn lifecycle(recorder: Arc<Recorder>) -> Lifecycle {
        Lifecycle::new(
            AppInfo::new("Service Host API", "0.1.0"),
            recorder,
            StateHandle::new(),
            LifecycleConfig::default(),
        )
    }

    #[tokio::test]
    async fn startup_and_shutdown_bracket_the_available_period() {
        let recorder = Arc::new(Recorder::default());
        let lifecycle = lifecycle(recorder.clone());

        let state = lifecycle.state().clone();
        let observed = lifecycle
            .scope(async move { Ok::<_, io::Error>(state.current()) })
            .await
            .unwrap();

        assert_eq!(observed, LifecycleState::Available);
        assert_eq!(recorder.events(), vec!["startup", "shutdown"]);
        assert_eq!(lifecycle.state().current(), LifecycleState::Stopped);
    }

    #[tokio::test]
    async fn startup_failure_skips_available_period() {
        let recorder = Arc::new(Recorder {
            fail_startup: true,
            ..Default::default()
        });
        let lifecycle = lifecycle(recorder.clone());
        let entered = Arc::new(Mutex::new(false));
        let flag = entered.clone();

        let err = lifecycle
            .scope(async move {
                *flag.lock().unwrap() = true;
                Ok::<_, io::Error>(())
            })
            .await
            .unwrap_err();

        assert!(matches!(err, LifecycleError::Startup(StartupError::Failed(_))));
        assert!(!*entered.lock().unwrap());
        assert_eq!(recorder.events(), vec!["startup"]);
        assert_eq!(lifecycle.state().current(), LifecycleState::Stopped);
    }

    #[tokio::test]
    async fn shutdown_failure_is_not_fatal() {
        let recorder = Arc::new(Recorder {
            fail_shutdown: true,
            ..Default::default()
        });
        let lifecycle = lifecycle(recorder.clone());

        lifecycle.scope(async { Ok::<_, io::Error>(()) }).await.unwrap();

        assert_eq!(recorder.events(), vec!["startup", "shutdown"]);
        assert_eq!(lifecycle.state().current(), LifecycleState::Stopped);
    }

    #[tokio::test]
    async fn shutdown_runs_after_serve_error() {
        let recorder = Arc::new(Recorder::default());
        let lifecycle = lifecycle(recorder.clone());

        let err = lifecycle
            .scope(async { Err::<(), _>(io::Error::other("listener closed")) })
            .await
            .unwrap_err();

        assert!(matches!(err, LifecycleError::Serve(_)));
        assert_eq!(recorder.events(), vec!["startup", "shutdown"]);
        assert_eq!(lifecycle.state().current(), LifecycleState::Stopped);
    }

    #[tokio::test]
    async fn shutdown_runs_after_panic() {
        let recorder = Arc::new(Recorder::default());
        let lifecycle = lifecycle(recorder.clone());

        let err = lifecycle
            .scope(async {
                if true {
                    panic!("router blew up");
                }
                Ok::<_, io::Error>(())
            })
            .await
            .unwrap_err();

        match err {
            LifecycleError::Panicked(msg) => assert_eq!(msg, "router blew up"),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(recorder.events(), vec!["startup", "shutdown"]);
        assert_eq!(lifecycle.state().current(), LifecycleState::Stopped);
    }

    #[tokio::test]
    async fn dropping_the_scope_aborts_the_available_period() {
        let recorder = Arc::new(Recorder::default());
        let lifecycle = lifecycle(recorder.clone());
        let (held_tx, held_rx) = tokio::sync::oneshot::channel::<()>();

        let scoped = lifecycle.scope(async move {
            let _held = held_tx;
            std::future::pending::<()>().await;
            Ok::<_, io::Error>(())
        });
        let timed_out = tokio::time::timeout(Duration::from_millis(100), scoped).await;
        assert!(timed_out.is_err());

        // The sender is released only once the spawned task is gone.
        let released = tokio::time::timeout(Duration::from_secs(5), held_rx)
            .await
            .unwrap();
        assert!(released.is_err());
        assert_eq!(recorder.events(), vec!["startup"]);
        assert_eq!(lifecycle.state().current(), LifecycleState::Available);
    }
}
