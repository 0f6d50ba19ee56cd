//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! ListenerConfig
//!     → listener.rs (parse, bind)
//!     → TcpListener handed to Application::run
//! ```
//!
//! # Design Decisions
//! - Binding happens before the lifecycle starts, so a port conflict is a
//!   plain error and never triggers the startup notification

pub mod listener;

pub use listener::{bind, ListenerError};
