//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Collaborator axum::Router
//!     → handle.rs (RouterHandle: router + optional prefix)
//!     → app builder (prefix checked)
//!     → http/server.rs (merged or nested into the host router)
//! ```
//!
//! # Design Decisions
//! - The host never inspects collaborator routes; it only mounts them
//! - Routers are fixed once the application is built
//! - echo.rs is a sample collaborator, not part of the host contract

pub mod echo;
pub mod handle;

pub use handle::RouterHandle;
