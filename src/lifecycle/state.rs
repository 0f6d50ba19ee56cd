//! Lifecycle state machine.
//!
//! # States
//! - Starting: startup notification in progress, no traffic served
//! - Available: routers mounted and serving
//! - Stopping: termination signal received, draining in-flight requests
//! - Stopped: shutdown notification finished (terminal)
//!
//! # State Transitions
//! ```text
//! Starting  → Available: startup notification completed
//! Starting  → Stopped:   startup notification failed
//! Available → Stopping:  external termination signal
//! Stopping  → Stopped:   shutdown notification finished (success or not)
//! ```
//!
//! # Design Decisions
//! - Illegal transitions are ignored, not errors
//! - Published through a watch channel so readers never block the writer

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;

use crate::observability::metrics;

/// Phase of the application lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    Starting,
    Available,
    Stopping,
    Stopped,
}

impl LifecycleState {
    /// Whether moving from `self` to `next` is a legal transition.
    pub fn can_transition_to(self, next: LifecycleState) -> bool {
        use LifecycleState::*;
        matches!(
            (self, next),
            (Starting, Available) | (Starting, Stopped) | (Available, Stopping) | (Stopping, Stopped)
        )
    }

    pub fn is_terminal(self) -> bool {
        self == LifecycleState::Stopped
    }

    /// Numeric code used for the state gauge.
    pub fn as_gauge(self) -> f64 {
        match self {
            LifecycleState::Starting => 0.0,
            LifecycleState::Available => 1.0,
            LifecycleState::Stopping => 2.0,
            LifecycleState::Stopped => 3.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LifecycleState::Starting => "starting",
            LifecycleState::Available => "available",
            LifecycleState::Stopping => "stopping",
            LifecycleState::Stopped => "stopped",
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shared, observable handle to the current lifecycle state.
///
/// Cloning is cheap; all clones observe the same state.
#[derive(Debug, Clone)]
pub struct StateHandle {
    tx: Arc<watch::Sender<LifecycleState>>,
}

impl StateHandle {
    /// Create a handle in the initial `Starting` state.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(LifecycleState::Starting);
        metrics::record_state(LifecycleState::Starting);
        Self { tx: Arc::new(tx) }
    }

    /// Current state.
    pub fn current(&self) -> LifecycleState {
        *self.tx.borrow()
    }

    /// Move to `next` if the transition is legal.
    ///
    /// Returns `true` when the state changed.
    pub fn advance(&self, next: LifecycleState) -> bool {
        let mut from = None;
        let changed = self.tx.send_if_modified(|state| {
            if state.can_transition_to(next) {
                from = Some(*state);
                *state = next;
                true
            } else {
                false
            }
        });

        match from {
            Some(from) => {
                tracing::debug!(from = %from, to = %next, "Lifecycle transition");
                metrics::record_state(next);
            }
            None => {
                tracing::trace!(current = %self.current(), requested = %next, "Ignoring lifecycle transition");
            }
        }
        changed
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<LifecycleState> {
        self.tx.subscribe()
    }

    /// Wait until the state is `target` or the lifecycle has stopped.
    ///
    /// Returns the state that ended the wait.
    pub async fn wait_for(&self, target: LifecycleState) -> LifecycleState {
        let mut rx = self.subscribe();
        // The sender lives as long as `self`, so the channel cannot close here.
        let reached = match rx.wait_for(|s| *s == target || s.is_terminal()).await {
            Ok(state) => *state,
            Err(_) => self.current(),
        };
        reached
    }
}

impl Default for StateHandle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legal_transitions() {
        use LifecycleState::*;
        assert!(Starting.can_transition_to(Available));
        assert!(Starting.can_transition_to(Stopped));
        assert!(Available.can_transition_to(Stopping));
        assert!(Stopping.can_transition_to(Stopped));

        assert!(!Starting.can_transition_to(Stopping));
        assert!(!Available.can_transition_to(Stopped));
        assert!(!Stopped.can_transition_to(Starting));
        assert!(!Stopping.can_transition_to(Stopping));
    }

    #[test]
    fn handle_ignores_illegal_transitions() {
        let state = StateHandle::new();
        assert_eq!(state.current(), LifecycleState::Starting);

        assert!(!state.advance(LifecycleState::Stopping));
        assert_eq!(state.current(), LifecycleState::Starting);

        assert!(state.advance(LifecycleState::Available));
        assert!(state.advance(LifecycleState::Stopping));
        assert!(!state.advance(LifecycleState::Stopping));
        assert!(state.advance(LifecycleState::Stopped));
        assert_eq!(state.current(), LifecycleState::Stopped);
    }

    #[test]
    fn clones_share_state() {
        let a = StateHandle::new();
        let b = a.clone();
        a.advance(LifecycleState::Available);
        assert_eq!(b.current(), LifecycleState::Available);
    }

    #[tokio::test]
    async fn wait_for_returns_on_terminal_state() {
        let state = StateHandle::new();
        let waiter = {
            let state = state.clone();
            tokio::spawn(async move { state.wait_for(LifecycleState::Available).await })
        };
        state.advance(LifecycleState::Stopped);
        assert_eq!(waiter.await.unwrap(), LifecycleState::Stopped);
    }

    #[test]
    fn serializes_snake_case() {
        let json = serde_json::to_string(&LifecycleState::Available).unwrap();
        assert_eq!(json, "\"available\"");
    }
}
