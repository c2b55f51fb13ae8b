use axum::{
    extract::{ws::Message, ws::WebSocket, State, WebSocketUpgrade},
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

use crate::app::AppState;

/// Axum handler — upgrades HTTP to WebSocket at GET /ws.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| run_connection(socket, state))
}

/// Per-connection event loop — lives for the entire WS session. Dashboard
/// clients only listen: every broadcast frame is forwarded, pings are
/// answered, and inbound text is ignored.
async fn run_connection(socket: WebSocket, state: Arc<AppState>) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    let active = state.client_connected();
    info!(conn_id = %conn_id, active, "dashboard client connected");

    let (mut tx, mut rx) = socket.split();
    let mut events = state.store.subscribe();

    loop {
        tokio::select! {
            msg = rx.next() => {
                match msg {
                    Some(Ok(Message::Ping(data))) => {
                        let _ = tx.send(Message::Pong(data)).await;
                    }
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    _ => {}
                }
            }

            event = events.recv() => {
                match event {
                    Ok(frame) => {
                        if tx.send(Message::Text(frame.into())).await.is_err() {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        // slow consumer: drop the backlog, keep the session
                        warn!(conn_id = %conn_id, skipped, "client lagged behind broadcast");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        }
    }

    let active = state.client_disconnected();
    info!(conn_id = %conn_id, active, "dashboard client disconnected");
}
