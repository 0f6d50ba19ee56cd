//! Application host.
//!
//! # Data Flow
//! ```text
//! Application::builder(title)
//!     → include_router / lifespan / config
//!     → registry.rs (validate, claim the construct-once slot)
//!     → Application
//!     → run(listener): lifecycle scope around the HTTP server
//! ```
//!
//! # Design Decisions
//! - At most one instance per registry; the global registry makes that per process
//! - The instance is an explicit value passed to the entry point, not ambient state
//! - Construction has no side effects besides claiming the slot

pub mod application;
pub mod error;
pub mod registry;

pub use application::{Application, ApplicationBuilder};
pub use error::ConfigurationError;
pub use registry::Registry;
