//! The application instance and its builder.

use std::future::Future;
use std::sync::Arc;

use tokio::net::TcpListener;

use super::error::ConfigurationError;
use super::registry::Registry;
use crate::config::HostConfig;
use crate::http::HttpServer;
use crate::lifecycle::{
    signals, AppInfo, Lifecycle, LifecycleError, Lifespan, LoggingLifespan, Shutdown, StateHandle,
};
use crate::routing::RouterHandle;

/// The running service: identity, lifecycle hook, and mounted routers.
pub struct Application {
    info: AppInfo,
    config: HostConfig,
    lifespan: Arc<dyn Lifespan>,
    routers: Vec<RouterHandle>,
    state: StateHandle,
    shutdown: Shutdown,
}

impl Application {
    pub fn builder(title: impl Into<String>) -> ApplicationBuilder {
        ApplicationBuilder::new(title)
    }

    /// Construct the process-wide instance with one router and the default hook.
    pub fn create(
        title: impl Into<String>,
        router: impl Into<RouterHandle>,
    ) -> Result<Self, ConfigurationError> {
        Self::builder(title).include_router(router).build()
    }

    pub fn info(&self) -> &AppInfo {
        &self.info
    }

    pub fn title(&self) -> &str {
        &self.info.title
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    pub fn mounted_routers(&self) -> usize {
        self.routers.len()
    }

    /// Handle for observing the lifecycle state; stays valid after `run`.
    pub fn state(&self) -> StateHandle {
        self.state.clone()
    }

    /// Handle that ends the available period when triggered.
    pub fn shutdown_handle(&self) -> Shutdown {
        self.shutdown.clone()
    }

    /// Serve on `listener` until SIGINT/SIGTERM or a shutdown trigger.
    pub async fn run(self, listener: TcpListener) -> Result<(), LifecycleError> {
        self.run_until(listener, signals::shutdown_signal()).await
    }

    /// Serve on `listener` until `signal` resolves or a shutdown trigger.
    ///
    /// The startup notification runs before the first request is accepted;
    /// the shutdown notification runs after serving stops, whatever the reason.
    pub async fn run_until<S>(self, listener: TcpListener, signal: S) -> Result<(), LifecycleError>
    where
        S: Future<Output = ()> + Send + 'static,
    {
        // Listen from the start; a signal during startup is kept until serving begins.
        let forward = {
            let shutdown = self.shutdown.clone();
            tokio::spawn(async move {
                signal.await;
                shutdown.trigger();
            })
        };
        let shutdown = self.shutdown.clone();
        let stop = async move { shutdown.triggered().await };

        tracing::debug!(
            title = %self.info.title,
            routers = self.routers.len(),
            "Running application"
        );

        let server = HttpServer::new(
            &self.config,
            self.info.clone(),
            self.routers,
            self.state.clone(),
        );
        let lifecycle = Lifecycle::new(
            self.info,
            self.lifespan,
            self.state,
            self.config.lifecycle.clone(),
        );

        let result = lifecycle.scope(server.serve(listener, stop)).await;
        forward.abort();
        result
    }
}

/// Collects the parts of an [`Application`] before it is claimed.
pub struct ApplicationBuilder {
    title: String,
    version: Option<String>,
    config: HostConfig,
    lifespan: Arc<dyn Lifespan>,
    routers: Vec<RouterHandle>,
}

impl ApplicationBuilder {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            version: None,
            config: HostConfig::default(),
            lifespan: Arc::new(LoggingLifespan),
            routers: Vec::new(),
        }
    }

    /// Override the version; defaults to `config.app.version`.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn config(mut self, config: HostConfig) -> Self {
        self.config = config;
        self
    }

    pub fn lifespan(mut self, lifespan: impl Lifespan + 'static) -> Self {
        self.lifespan = Arc::new(lifespan);
        self
    }

    pub fn include_router(mut self, router: impl Into<RouterHandle>) -> Self {
        self.routers.push(router.into());
        self
    }

    /// Claim the process-wide slot.
    pub fn build(self) -> Result<Application, ConfigurationError> {
        self.build_in(Registry::global())
    }

    /// Claim the slot of `registry`.
    pub fn build_in(self, registry: &Registry) -> Result<Application, ConfigurationError> {
        registry.create(self)
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigurationError> {
        if self.routers.is_empty() {
            return Err(ConfigurationError::MissingRouter);
        }
        if let Some(bad) = self.routers.iter().find(|r| !r.has_valid_prefix()) {
            return Err(ConfigurationError::InvalidPrefix(
                bad.prefix().unwrap_or_default().to_string(),
            ));
        }
        Ok(())
    }

    pub(crate) fn into_application(self) -> Application {
        let mut config = self.config;
        config.app.title = self.title;
        if let Some(version) = self.version {
            config.app.version = version;
        }

        Application {
            info: AppInfo::new(config.app.title.clone(), config.app.version.clone()),
            config,
            lifespan: self.lifespan,
            routers: self.routers,
            state: StateHandle::new(),
            shutdown: Shutdown::new(),
        }
    }
}
