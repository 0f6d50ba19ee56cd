//! Shared utilities for lifecycle integration tests.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{extract::State, routing::get, Router};
use service_host::lifecycle::{AppInfo, HookError, Lifespan};
use tokio::net::TcpListener;

/// Ordered record of hook calls and handled requests.
#[derive(Clone, Default)]
pub struct Events(Arc<Mutex<Vec<&'static str>>>);

impl Events {
    pub fn push(&self, event: &'static str) {
        self.0.lock().unwrap().push(event);
    }

    pub fn snapshot(&self) -> Vec<&'static str> {
        self.0.lock().unwrap().clone()
    }
}

/// Lifespan that records its calls and can be told to fail, stall or panic.
#[derive(Clone, Default)]
pub struct RecordingLifespan {
    pub events: Events,
    pub fail_startup: bool,
    pub fail_shutdown: bool,
    pub panic_startup: bool,
    pub startup_delay: Duration,
}

#[async_trait]
impl Lifespan for RecordingLifespan {
    async fn startup(&self, _app: &AppInfo) -> Result<(), HookError> {
        self.events.push("startup");
        if !self.startup_delay.is_zero() {
            tokio::time::sleep(self.startup_delay).await;
        }
        if self.panic_startup {
            panic!("startup hook panicked");
        }
        if self.fail_startup {
            return Err("database unreachable".into());
        }
        Ok(())
    }

    async fn shutdown(&self, _app: &AppInfo) -> Result<(), HookError> {
        self.events.push("shutdown");
        if self.fail_shutdown {
            return Err("flush failed".into());
        }
        Ok(())
    }
}

/// Router whose `/work` handler records a "request" event and whose
/// `/slow` handler records "slow-finished" after [`SLOW_HANDLER`].
pub fn recording_router(events: Events) -> Router {
    Router::new()
        .route("/work", get(work))
        .route("/slow", get(slow))
        .with_state(events)
}

async fn work(State(events): State<Events>) -> &'static str {
    events.push("request");
    "done"
}

pub const SLOW_HANDLER: Duration = Duration::from_secs(2);

async fn slow(State(events): State<Events>) -> &'static str {
    tokio::time::sleep(SLOW_HANDLER).await;
    events.push("slow-finished");
    "late"
}

pub async fn ephemeral_listener() -> (TcpListener, SocketAddr) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    (listener, addr)
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
