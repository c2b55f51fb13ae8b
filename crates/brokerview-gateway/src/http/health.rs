use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::{atomic::Ordering, Arc};

use crate::app::AppState;

/// GET /health — liveness probe, returns server metadata.
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<Value> {
    let uptime = chrono::Utc::now() - state.started_at;
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_secs": uptime.num_seconds(),
        "ws_clients": state.ws_clients.load(Ordering::Relaxed),
    }))
}

/// GET /version
pub async fn version_handler() -> Json<Value> {
    Json(json!({
        "version": env!("CARGO_PKG_VERSION"),
        "git_sha": env!("BROKERVIEW_GIT_SHA"),
    }))
}
