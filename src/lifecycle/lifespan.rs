//! Startup/shutdown notification hooks.

use async_trait::async_trait;

/// Error returned by a lifecycle hook.
pub type HookError = Box<dyn std::error::Error + Send + Sync>;

/// Identity of the running application, handed to every hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppInfo {
    pub title: String,
    pub version: String,
}

impl AppInfo {
    pub fn new(title: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            version: version.into(),
        }
    }
}

/// A pair of notifications scoped around the available period.
///
/// `startup` runs once before any request is served; an error aborts the
/// lifecycle. `shutdown` runs once after serving stops; an error is logged
/// and otherwise ignored.
#[async_trait]
pub trait Lifespan: Send + Sync {
    async fn startup(&self, app: &AppInfo) -> Result<(), HookError>;

    async fn shutdown(&self, app: &AppInfo) -> Result<(), HookError>;
}

/// Default hook: announces startup and shutdown in the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingLifespan;

#[async_trait]
impl Lifespan for LoggingLifespan {
    async fn startup(&self, app: &AppInfo) -> Result<(), HookError> {
        tracing::info!(version = %app.version, "Starting {}...", app.title);
        Ok(())
    }

    async fn shutdown(&self, app: &AppInfo) -> Result<(), HookError> {
        tracing::info!("Shutting down {}...", app.title);
        Ok(())
    }
}
