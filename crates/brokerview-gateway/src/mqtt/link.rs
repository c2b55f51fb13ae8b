//! The broker link: one rumqttc connection, fed into the core event store,
//! with bounded exponential backoff on failure. Runs on its own task so a
//! retry wait never touches the request path, and stops when the process
//! cancellation token fires.

use std::sync::Arc;
use std::time::Duration;

use brokerview_core::config::{BrokerConfig, RetryConfig};
use brokerview_core::{BrokerMessage, DiagnosticsRecorder, EventStore};
use rumqttc::{
    AsyncClient, ClientError, ConnectReturnCode, ConnectionError, Event, EventLoop, MqttOptions,
    Packet, Publish, QoS,
};
use serde_json::json;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::mqtt::reason;

/// Cheap clonable publish handle for the HTTP facade. Fire-and-forget: the
/// broker's own acknowledgment flow is not surfaced to callers.
#[derive(Clone)]
pub struct MqttPublisher {
    client: AsyncClient,
}

impl MqttPublisher {
    pub async fn publish(&self, topic: &str, payload: &str) -> Result<(), ClientError> {
        self.client
            .publish(topic, QoS::AtMostOnce, false, payload)
            .await
    }
}

pub struct MqttLink {
    client: AsyncClient,
    eventloop: EventLoop,
    store: Arc<EventStore>,
    diagnostics: Arc<DiagnosticsRecorder>,
    retry: RetryConfig,
    connected: bool,
    attempts: u32,
}

impl MqttLink {
    pub fn new(
        broker: &BrokerConfig,
        retry: RetryConfig,
        store: Arc<EventStore>,
        diagnostics: Arc<DiagnosticsRecorder>,
    ) -> (Self, MqttPublisher) {
        let mut options = MqttOptions::new(broker.client_id.clone(), broker.host.clone(), broker.port);
        options.set_keep_alive(Duration::from_secs(broker.keepalive_secs));
        if let (Some(user), Some(pass)) = (&broker.username, &broker.password) {
            options.set_credentials(user.clone(), pass.clone());
        }

        let (client, eventloop) = AsyncClient::new(options, 100);
        let publisher = MqttPublisher {
            client: client.clone(),
        };

        (
            Self {
                client,
                eventloop,
                store,
                diagnostics,
                retry,
                connected: false,
                attempts: 0,
            },
            publisher,
        )
    }

    /// Drive the connection until cancelled or the retry limit is hit.
    /// rumqttc reconnects on the next poll after an error, so retry is a
    /// backoff wait followed by continuing the loop.
    pub async fn run(mut self, cancel: CancellationToken) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    let _ = self.client.disconnect().await;
                    info!("broker link stopped");
                    return;
                }

                event = self.eventloop.poll() => {
                    match event {
                        Ok(event) => self.handle_event(event).await,
                        Err(error) => {
                            if !self.handle_failure(error, &cancel).await {
                                return;
                            }
                        }
                    }
                }
            }
        }
    }

    async fn handle_event(&mut self, event: Event) {
        match event {
            Event::Incoming(Packet::ConnAck(ack)) if ack.code == ConnectReturnCode::Success => {
                self.on_connected().await;
            }
            Event::Incoming(Packet::Publish(publish)) => self.on_publish(publish),
            Event::Incoming(Packet::Disconnect) => self.on_disconnected("server sent DISCONNECT"),
            _ => {}
        }
    }

    async fn on_connected(&mut self) {
        self.connected = true;
        self.attempts = 0;
        self.store.record_connected();
        info!("connected to MQTT broker");

        self.diagnostics.remove("mqtt", "connection_attempt");
        self.diagnostics.record("mqtt", "status", json!("connected"));

        // mirror everything the broker sees
        if let Err(e) = self.client.subscribe("#", QoS::AtMostOnce).await {
            warn!(error = %e, "wildcard subscribe failed");
            self.store
                .record_error(format!("Failed to subscribe to all topics: {e}"));
        }
    }

    fn on_publish(&self, publish: Publish) {
        let message = BrokerMessage::from_raw(&publish.topic, &publish.payload);
        debug!(topic = %message.topic, "broker message received");
        self.diagnostics.record(
            "mqtt",
            "last_message",
            json!(format!("{}: {}", message.topic, message.payload)),
        );
        self.store.append(message);
    }

    fn on_disconnected(&mut self, reason: &str) {
        if !self.connected {
            return;
        }
        self.connected = false;
        self.store.record_disconnected();
        self.store
            .record_error(format!("Disconnected from MQTT broker: {reason}"));
        self.diagnostics
            .record("mqtt", "status", json!("disconnected"));
        warn!(reason, "disconnected from MQTT broker");
    }

    /// Record the failure and wait out the backoff. Returns false when the
    /// link should stop (cancelled or retry limit reached).
    async fn handle_failure(&mut self, error: ConnectionError, cancel: &CancellationToken) -> bool {
        let reason = failure_reason(&error);
        if self.connected {
            self.on_disconnected(&reason);
        } else {
            self.store
                .record_error(format!("Failed to connect to MQTT broker: {reason}"));
        }

        self.attempts += 1;
        if let Some(max) = self.retry.max_attempts {
            if self.attempts >= max {
                error!(attempts = self.attempts, "broker retry limit reached, giving up");
                self.store
                    .record_error("Broker retry limit reached, giving up");
                self.diagnostics.record("mqtt", "status", json!("failed"));
                return false;
            }
        }

        let delay = backoff_delay(self.attempts, &self.retry);
        warn!(
            attempt = self.attempts,
            delay_secs = delay.as_secs(),
            error = %reason,
            "broker connection failed, retrying"
        );
        self.diagnostics.record(
            "mqtt",
            "connection_attempt",
            json!(format!("attempt {} in {}s", self.attempts, delay.as_secs())),
        );

        tokio::select! {
            _ = cancel.cancelled() => false,
            _ = tokio::time::sleep(delay) => true,
        }
    }
}

fn failure_reason(error: &ConnectionError) -> String {
    match error {
        ConnectionError::ConnectionRefused(code) => {
            reason::reason_for(reason::return_code(*code))
        }
        other => other.to_string(),
    }
}

fn backoff_delay(attempts: u32, retry: &RetryConfig) -> Duration {
    let exp = attempts.saturating_sub(1).min(6);
    let secs = retry
        .base_delay_secs
        .saturating_mul(1 << exp)
        .min(retry.max_delay_secs);
    Duration::from_secs(secs)
}
