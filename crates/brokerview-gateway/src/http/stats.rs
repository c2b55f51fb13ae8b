use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::app::AppState;

/// GET /stats — connection/topic/message counters plus the error ring.
pub async fn stats_handler(State(state): State<Arc<AppState>>) -> Json<Value> {
    let snap = state.store.snapshot();
    Json(json!({
        "connection_count": snap.connection_count,
        "topic_count": snap.topics.len(),
        "message_count": snap.recent_messages.len(),
        "errors": snap.errors,
    }))
}

/// GET /messages — recent message history and every topic seen, for late
/// joiners (the live stream carries only messages from subscribe time on).
pub async fn messages_handler(State(state): State<Arc<AppState>>) -> Json<Value> {
    let snap = state.store.snapshot();
    Json(json!({
        "messages": snap.recent_messages,
        "topics": snap.topics,
    }))
}
