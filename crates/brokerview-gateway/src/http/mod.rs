use axum::Json;
use serde_json::{json, Value};

pub mod debugbar;
pub mod health;
pub mod publish;
pub mod stats;
pub mod ui;

/// Uniform error body: `{"success": false, "code": ..., "message": ...}`.
pub(crate) fn error_body(code: &str, message: impl Into<String>) -> Json<Value> {
    Json(json!({
        "success": false,
        "code": code,
        "message": message.into(),
    }))
}
