use axum::{extract::State, http::StatusCode, Json};
use brokerview_core::BrokerviewError;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, warn};

use crate::app::AppState;
use crate::http::error_body;

#[derive(Debug, Deserialize)]
pub struct PublishBody {
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub message: String,
}

/// POST /publish — forward one message to the broker, fire-and-forget.
/// Empty or missing topic/message is rejected outright; the broker is never
/// called with a malformed request.
pub async fn publish_handler(
    State(state): State<Arc<AppState>>,
    Json(body): Json<PublishBody>,
) -> (StatusCode, Json<Value>) {
    if body.topic.trim().is_empty() {
        let err = BrokerviewError::BadRequest("topic must not be empty".into());
        return (StatusCode::BAD_REQUEST, error_body(err.code(), err.to_string()));
    }
    if body.message.is_empty() {
        let err = BrokerviewError::BadRequest("message must not be empty".into());
        return (StatusCode::BAD_REQUEST, error_body(err.code(), err.to_string()));
    }

    match state.publisher.publish(&body.topic, &body.message).await {
        Ok(()) => {
            info!(topic = %body.topic, "published message to broker");
            (StatusCode::OK, Json(json!({ "success": true })))
        }
        Err(e) => {
            warn!(topic = %body.topic, error = %e, "publish failed");
            let err = BrokerviewError::Broker(e.to_string());
            (StatusCode::BAD_GATEWAY, error_body(err.code(), err.to_string()))
        }
    }
}
