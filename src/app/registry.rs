//! Construct-once slot for the application instance.

use std::sync::atomic::{AtomicBool, Ordering};

use super::application::{Application, ApplicationBuilder};
use super::error::ConfigurationError;

static GLOBAL: Registry = Registry::new();

/// Tracks whether an application has been constructed.
///
/// `Registry::global()` is the process-wide slot. Separate registries are
/// independent, which lets tests exercise the invariant in isolation.
#[derive(Debug)]
pub struct Registry {
    claimed: AtomicBool,
}

impl Registry {
    pub const fn new() -> Self {
        Self {
            claimed: AtomicBool::new(false),
        }
    }

    /// The process-wide registry.
    pub fn global() -> &'static Registry {
        &GLOBAL
    }

    pub fn is_claimed(&self) -> bool {
        self.claimed.load(Ordering::Acquire)
    }

    /// Validate `builder` and, if the slot is free, claim it.
    ///
    /// A rejected builder leaves the slot untouched.
    pub fn create(&self, builder: ApplicationBuilder) -> Result<Application, ConfigurationError> {
        builder.validate()?;

        self.claimed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ConfigurationError::AlreadyCreated)?;

        Ok(builder.into_application())
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
