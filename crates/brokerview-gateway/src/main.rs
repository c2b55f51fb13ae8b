use std::net::SocketAddr;
use std::sync::Arc;

use brokerview_core::{BrokerviewConfig, DiagnosticsRecorder, EventStore};
use brokerview_gateway::{app, mqtt};
use tokio_util::sync::CancellationToken;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "brokerview_gateway=info,tower_http=debug".into()),
        )
        .init();

    // load config: explicit path via BROKERVIEW_CONFIG > ./brokerview.toml
    let config_path = std::env::var("BROKERVIEW_CONFIG").ok();
    let config = BrokerviewConfig::load(config_path.as_deref()).unwrap_or_else(|e| {
        tracing::warn!("Config load failed ({}), using defaults", e);
        BrokerviewConfig::default()
    });

    let store = Arc::new(EventStore::new());
    let diagnostics = Arc::new(DiagnosticsRecorder::new());

    // broker link runs on its own task; retries never touch the request path
    let cancel = CancellationToken::new();
    let (link, publisher) = mqtt::link::MqttLink::new(
        &config.broker,
        config.retry.clone(),
        Arc::clone(&store),
        Arc::clone(&diagnostics),
    );
    info!(
        host = %config.broker.host,
        port = config.broker.port,
        "starting broker link"
    );
    let link_task = tokio::spawn(link.run(cancel.clone()));

    let bind = config.gateway.bind.clone();
    let port = config.gateway.port;
    let state = Arc::new(app::AppState::new(config, store, diagnostics, publisher));
    let router = app::build_router(state);

    let addr: SocketAddr = format!("{}:{}", bind, port).parse()?;
    info!("brokerview gateway listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal(cancel.clone()))
        .await?;

    // stop broker retries on teardown
    cancel.cancel();
    let _ = link_task.await;
    Ok(())
}

async fn shutdown_signal(cancel: CancellationToken) {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received");
    cancel.cancel();
}
