//! Debug-bar endpoints and the request panel middleware — the in-process
//! diagnostics view of broker status, request timing, and client-reported
//! page performance.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
    Json,
};
use brokerview_core::BrokerviewError;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tracing::warn;

use crate::app::AppState;
use crate::http::error_body;

/// GET /debug-bar — nested panel data. Retrieval failure surfaces as a
/// generic 500 indicator, never a process error.
pub async fn data_handler(State(state): State<Arc<AppState>>) -> (StatusCode, Json<Value>) {
    match serde_json::to_value(state.diagnostics.data()) {
        Ok(panels) => (
            StatusCode::OK,
            Json(json!({
                "enabled": state.diagnostics.is_enabled(),
                "panels": panels,
            })),
        ),
        Err(e) => {
            warn!(error = %e, "debug bar data fetch failed");
            let err = BrokerviewError::Diagnostics("failed to fetch debug bar data".into());
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_body(err.code(), err.to_string()),
            )
        }
    }
}

/// POST /debug-bar/toggle — flip recording on/off, return the new state.
pub async fn toggle_handler(State(state): State<Arc<AppState>>) -> Json<Value> {
    let enabled = state.diagnostics.toggle();
    Json(json!({ "enabled": enabled }))
}

#[derive(Debug, Deserialize)]
pub struct PerformanceBody {
    pub page_load_time_ms: f64,
    pub dom_ready_time_ms: f64,
}

/// POST /debug-bar/performance — browser-reported timings for the
/// performance panel.
pub async fn performance_handler(
    State(state): State<Arc<AppState>>,
    Json(body): Json<PerformanceBody>,
) -> Json<Value> {
    state.diagnostics.record(
        "performance",
        "page_load_time",
        json!(format!("{:.0}ms", body.page_load_time_ms)),
    );
    state.diagnostics.record(
        "performance",
        "dom_ready_time",
        json!(format!("{:.0}ms", body.dom_ready_time_ms)),
    );
    Json(json!({ "success": true }))
}

/// Records path, method, and duration of every request into the `request`
/// panel. The recorder itself no-ops while disabled.
pub async fn request_panel_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let method = request.method().to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    let duration = start.elapsed();
    state.diagnostics.record("request", "path", json!(path));
    state.diagnostics.record("request", "method", json!(method));
    state.diagnostics.record(
        "request",
        "duration",
        json!(format!("{:.2}s", duration.as_secs_f64())),
    );
    response
}
