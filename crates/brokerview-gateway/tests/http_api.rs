//! Facade-level tests: drive the axum router with `tower::ServiceExt` and a
//! real event store. The broker client is constructed but never polled, so
//! publishes are enqueued without needing a live broker.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use brokerview_core::{BrokerMessage, BrokerviewConfig, DiagnosticsRecorder, EventStore};
use brokerview_gateway::app::{build_router, AppState};
use brokerview_gateway::mqtt::link::MqttLink;
use std::sync::Arc;
use tower::ServiceExt;

// The link must outlive the test: dropping it drops the rumqttc event loop
// and with it the request channel that publishes are enqueued into.
fn test_app() -> (Router, Arc<AppState>, MqttLink) {
    let config = BrokerviewConfig::default();
    let store = Arc::new(EventStore::new());
    let diagnostics = Arc::new(DiagnosticsRecorder::new());
    let (link, publisher) = MqttLink::new(
        &config.broker,
        config.retry.clone(),
        Arc::clone(&store),
        Arc::clone(&diagnostics),
    );
    let state = Arc::new(AppState::new(config, store, diagnostics, publisher));
    (build_router(state.clone()), state, link)
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn stats_start_at_zero() {
    let (router, _state, _link) = test_app();
    let response = router.oneshot(get("/stats")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["connection_count"], 0);
    assert_eq!(body["topic_count"], 0);
    assert_eq!(body["message_count"], 0);
    assert_eq!(body["errors"], serde_json::json!([]));
}

#[tokio::test]
async fn stats_reflect_store_contents() {
    let (router, state, _link) = test_app();
    state.store.record_connected();
    state
        .store
        .append(BrokerMessage::from_raw("sensors/temp", b"21.5"));
    state
        .store
        .append(BrokerMessage::from_raw("sensors/humidity", b"40"));
    state.store.record_error("Failed to connect to MQTT broker: Banned");

    let body = body_json(router.oneshot(get("/stats")).await.unwrap()).await;
    assert_eq!(body["connection_count"], 1);
    assert_eq!(body["topic_count"], 2);
    assert_eq!(body["message_count"], 2);
    assert_eq!(body["errors"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn messages_returns_history_for_late_joiners() {
    let (router, state, _link) = test_app();
    state.store.append(BrokerMessage::from_raw("a/b", b"one"));
    state.store.append(BrokerMessage::from_raw("a/c", b"two"));

    let body = body_json(router.oneshot(get("/messages")).await.unwrap()).await;
    assert_eq!(body["messages"].as_array().unwrap().len(), 2);
    assert_eq!(body["messages"][0]["payload"], "one");
    assert_eq!(body["topics"], serde_json::json!(["a/b", "a/c"]));
}

#[tokio::test]
async fn publish_rejects_empty_topic() {
    let (router, _state, _link) = test_app();
    let response = router
        .oneshot(post_json(
            "/publish",
            serde_json::json!({ "topic": "", "message": "hello" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn publish_rejects_missing_message() {
    let (router, _state, _link) = test_app();
    let response = router
        .oneshot(post_json(
            "/publish",
            serde_json::json!({ "topic": "a/b" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn publish_accepts_a_well_formed_request() {
    let (router, _state, _link) = test_app();
    let response = router
        .oneshot(post_json(
            "/publish",
            serde_json::json!({ "topic": "a/b", "message": "hello" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["success"], true);
}

#[tokio::test]
async fn version_reports_package_metadata() {
    let (router, _state, _link) = test_app();
    let body = body_json(router.oneshot(get("/version")).await.unwrap()).await;
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["git_sha"].is_string());
}

#[tokio::test]
async fn health_reports_client_count() {
    let (router, state, _link) = test_app();
    state.client_connected();
    state.client_connected();

    let body = body_json(router.oneshot(get("/health")).await.unwrap()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["ws_clients"], 2);
}

#[tokio::test]
async fn debug_bar_toggle_flips_and_reports_state() {
    let (router, state, _link) = test_app();
    assert!(state.diagnostics.is_enabled());

    let response = router
        .clone()
        .oneshot(post_json("/debug-bar/toggle", serde_json::json!({})))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["enabled"], false);

    let body = body_json(router.oneshot(get("/debug-bar")).await.unwrap()).await;
    assert_eq!(body["enabled"], false);
}

#[tokio::test]
async fn performance_post_lands_in_the_panel() {
    let (router, state, _link) = test_app();
    let response = router
        .oneshot(post_json(
            "/debug-bar/performance",
            serde_json::json!({ "page_load_time_ms": 321.0, "dom_ready_time_ms": 123.0 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let panels = state.diagnostics.data();
    assert_eq!(panels["performance"]["page_load_time"], "321ms");
    assert_eq!(panels["performance"]["dom_ready_time"], "123ms");
}

#[tokio::test]
async fn request_middleware_records_the_previous_request() {
    let (router, _state, _link) = test_app();
    router.clone().oneshot(get("/stats")).await.unwrap();

    let body = body_json(router.oneshot(get("/debug-bar")).await.unwrap()).await;
    // the /debug-bar handler reads panel data before its own middleware
    // records, so the last recorded request is the /stats call
    assert_eq!(body["panels"]["request"]["path"], "/stats");
    assert_eq!(body["panels"]["request"]["method"], "GET");
    assert!(body["panels"]["request"]["duration"]
        .as_str()
        .unwrap()
        .ends_with('s'));
}

#[tokio::test]
async fn index_serves_the_embedded_dashboard() {
    let (router, _state, _link) = test_app();
    let response = router.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(std::str::from_utf8(&bytes).unwrap().contains("Brokerview"));
}
