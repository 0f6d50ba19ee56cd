//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Startup notification → Available (or Stopped on failure)
//!
//! Available period (scope.rs):
//!     Serve mounted routers on a dedicated task
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stopping → drain → shutdown notification → Stopped
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → end the available period
//! ```
//!
//! # Design Decisions
//! - Startup and shutdown are one scoped acquisition, not two callbacks
//! - Startup failure is fatal, shutdown failure is best-effort
//! - Hooks have deadlines: a hung hook is treated as a failed one
//! - The shutdown trigger is sticky; a signal during startup is not lost

mod hook;
pub mod lifespan;
pub mod scope;
pub mod shutdown;
pub mod signals;
pub mod startup;
pub mod state;

pub use lifespan::{AppInfo, HookError, Lifespan, LoggingLifespan};
pub use scope::{Lifecycle, LifecycleError};
pub use shutdown::{Shutdown, ShutdownError};
pub use startup::StartupError;
pub use state::{LifecycleState, StateHandle};
