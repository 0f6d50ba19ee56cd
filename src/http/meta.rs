//! Built-in `/health` and `/info` endpoints.

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;
use serde_json::{json, Value};

use crate::lifecycle::{AppInfo, LifecycleState, StateHandle};

/// State shared by the meta handlers.
#[derive(Debug, Clone)]
pub struct MetaState {
    pub info: AppInfo,
    pub state: StateHandle,
}

#[derive(Debug, Serialize)]
struct InfoResponse {
    title: String,
    version: String,
    state: LifecycleState,
}

pub fn router(meta: MetaState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/info", get(info))
        .with_state(meta)
}

/// 200 while available, 503 otherwise so balancers stop routing during drain.
async fn health(State(meta): State<MetaState>) -> (StatusCode, Json<Value>) {
    let state = meta.state.current();
    let status = if state == LifecycleState::Available {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(json!({ "status": state })))
}

async fn info(State(meta): State<MetaState>) -> Json<InfoResponse> {
    Json(InfoResponse {
        title: meta.info.title,
        version: meta.info.version,
        state: meta.state.current(),
    })
}
