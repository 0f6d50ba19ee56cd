//! Echo router, the sample collaborator mounted by the binary.

use axum::{
    body::Bytes,
    extract::Path,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

pub fn router() -> Router {
    Router::new()
        .route("/echo", post(echo_body))
        .route("/echo/{message}", get(echo_message))
}

async fn echo_body(body: Bytes) -> Bytes {
    body
}

async fn echo_message(Path(message): Path<String>) -> Json<Value> {
    Json(json!({ "message": message }))
}
