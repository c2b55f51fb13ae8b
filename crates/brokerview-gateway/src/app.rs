use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use brokerview_core::{BrokerviewConfig, DiagnosticsRecorder, EventStore};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use crate::mqtt::link::MqttPublisher;

/// Central shared state — passed as Arc<AppState> to all axum handlers.
pub struct AppState {
    pub config: BrokerviewConfig,
    pub store: Arc<EventStore>,
    pub diagnostics: Arc<DiagnosticsRecorder>,
    pub publisher: MqttPublisher,
    /// Live dashboard WS sessions.
    pub ws_clients: AtomicUsize,
    pub started_at: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    pub fn new(
        config: BrokerviewConfig,
        store: Arc<EventStore>,
        diagnostics: Arc<DiagnosticsRecorder>,
        publisher: MqttPublisher,
    ) -> Self {
        Self {
            config,
            store,
            diagnostics,
            publisher,
            ws_clients: AtomicUsize::new(0),
            started_at: chrono::Utc::now(),
        }
    }

    pub fn client_connected(&self) -> usize {
        self.ws_clients.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn client_disconnected(&self) -> usize {
        self.ws_clients.fetch_sub(1, Ordering::Relaxed) - 1
    }
}

/// Assemble the full axum router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(crate::http::ui::index_handler))
        .route("/static/script.js", get(crate::http::ui::script_handler))
        .route("/ws", get(crate::ws::connection::ws_handler))
        .route("/publish", post(crate::http::publish::publish_handler))
        .route("/stats", get(crate::http::stats::stats_handler))
        .route("/messages", get(crate::http::stats::messages_handler))
        .route("/version", get(crate::http::health::version_handler))
        .route("/health", get(crate::http::health::health_handler))
        .route("/debug-bar", get(crate::http::debugbar::data_handler))
        .route(
            "/debug-bar/toggle",
            post(crate::http::debugbar::toggle_handler),
        )
        .route(
            "/debug-bar/performance",
            post(crate::http::debugbar::performance_handler),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            crate::http::debugbar::request_panel_middleware,
        ))
        .with_state(state)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(tower_http::cors::CorsLayer::permissive())
}
