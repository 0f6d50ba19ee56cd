//! Mountable router handle.
//!
//! # Responsibilities
//! - Wrap a collaborator's `axum::Router`
//! - Carry an optional mount prefix
//! - Merge or nest into the host router
//!
//! # Design Decisions
//! - Prefix rules are checked when the application is built, not when mounted,
//!   so a bad prefix is a configuration error instead of an axum panic

use axum::Router;

/// A router supplied by a collaborator, plus where to mount it.
#[derive(Debug, Clone)]
pub struct RouterHandle {
    router: Router,
    prefix: Option<String>,
}

impl RouterHandle {
    /// Mount `router` at the root.
    pub fn new(router: Router) -> Self {
        Self {
            router,
            prefix: None,
        }
    }

    /// Mount under `prefix` (e.g. `/api`).
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Whether the prefix can be nested: non-empty, starts with `/`, and
    /// neither is nor ends with `/`.
    pub fn has_valid_prefix(&self) -> bool {
        match self.prefix.as_deref() {
            None => true,
            Some(p) => p.starts_with('/') && p.len() > 1 && !p.ends_with('/'),
        }
    }

    /// Attach this router to `host`.
    pub(crate) fn mount(self, host: Router) -> Router {
        match self.prefix {
            Some(prefix) => host.nest(&prefix, self.router),
            None => host.merge(self.router),
        }
    }
}

impl From<Router> for RouterHandle {
    fn from(router: Router) -> Self {
        Self::new(router)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_rules() {
        let handle = || RouterHandle::new(Router::new());

        assert!(handle().has_valid_prefix());
        assert!(handle().with_prefix("/api").has_valid_prefix());
        assert!(handle().with_prefix("/api/v1").has_valid_prefix());

        assert!(!handle().with_prefix("").has_valid_prefix());
        assert!(!handle().with_prefix("/").has_valid_prefix());
        assert!(!handle().with_prefix("api").has_valid_prefix());
        assert!(!handle().with_prefix("/api/").has_valid_prefix());
    }
}
