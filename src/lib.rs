//! Service host library.
//!
//! Runs a startup/shutdown lifecycle around an HTTP available period and
//! mounts collaborator routers.

pub mod app;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod routing;

pub use app::{Application, ApplicationBuilder, ConfigurationError, Registry};
pub use config::HostConfig;
pub use lifecycle::{LifecycleError, LifecycleState, Lifespan, Shutdown};
pub use routing::RouterHandle;
