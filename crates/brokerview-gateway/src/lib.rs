//! HTTP/WS facade and MQTT broker link for the brokerview dashboard.
//! All shared state lives in [`app::AppState`]; the broker link feeds the
//! core event store from its own task and the axum handlers read it back.

pub mod app;
pub mod http;
pub mod mqtt;
pub mod ws;
