use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_BIND: &str = "0.0.0.0";
pub const DEFAULT_BROKER_PORT: u16 = 1883;
pub const DEFAULT_KEEPALIVE_SECS: u64 = 60;
pub const MESSAGE_HISTORY_CAP: usize = 100; // dashboard shows the last 100 messages
pub const ERROR_LOG_CAP: usize = 100; // same bound as the message ring
pub const RETRY_BASE_DELAY_SECS: u64 = 5;
pub const RETRY_MAX_DELAY_SECS: u64 = 60;

/// Top-level config (brokerview.toml + BROKERVIEW_* env overrides).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokerviewConfig {
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub broker: BrokerConfig,
    #[serde(default)]
    pub retry: RetryConfig,
}

impl Default for BrokerviewConfig {
    fn default() -> Self {
        Self {
            gateway: GatewayConfig::default(),
            broker: BrokerConfig::default(),
            retry: RetryConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

/// MQTT broker endpoint. Credentials are optional; both must be set for
/// them to be passed to the broker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokerConfig {
    #[serde(default = "default_broker_host")]
    pub host: String,
    #[serde(default = "default_broker_port")]
    pub port: u16,
    #[serde(default = "default_keepalive")]
    pub keepalive_secs: u64,
    pub username: Option<String>,
    pub password: Option<String>,
    #[serde(default = "default_client_id")]
    pub client_id: String,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            host: default_broker_host(),
            port: DEFAULT_BROKER_PORT,
            keepalive_secs: DEFAULT_KEEPALIVE_SECS,
            username: None,
            password: None,
            client_id: default_client_id(),
        }
    }
}

/// Reconnect behavior for the broker link: exponential backoff from
/// `base_delay_secs` capped at `max_delay_secs`. `max_attempts = None`
/// retries until shutdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_base_delay")]
    pub base_delay_secs: u64,
    #[serde(default = "default_max_delay")]
    pub max_delay_secs: u64,
    pub max_attempts: Option<u32>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            base_delay_secs: RETRY_BASE_DELAY_SECS,
            max_delay_secs: RETRY_MAX_DELAY_SECS,
            max_attempts: None,
        }
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}
fn default_broker_host() -> String {
    "localhost".to_string()
}
fn default_broker_port() -> u16 {
    DEFAULT_BROKER_PORT
}
fn default_keepalive() -> u64 {
    DEFAULT_KEEPALIVE_SECS
}
fn default_client_id() -> String {
    "brokerview".to_string()
}
fn default_base_delay() -> u64 {
    RETRY_BASE_DELAY_SECS
}
fn default_max_delay() -> u64 {
    RETRY_MAX_DELAY_SECS
}

impl BrokerviewConfig {
    /// Load config from a TOML file with BROKERVIEW_* env var overrides.
    ///
    /// Checks in order:
    ///   1. Explicit path argument
    ///   2. ./brokerview.toml
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path.unwrap_or("brokerview.toml");

        let config: BrokerviewConfig = Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed("BROKERVIEW_").split("_"))
            .extract()
            .map_err(|e| crate::error::BrokerviewError::Config(e.to_string()))?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_constants() {
        let config = BrokerviewConfig::default();
        assert_eq!(config.gateway.port, DEFAULT_PORT);
        assert_eq!(config.broker.host, "localhost");
        assert_eq!(config.broker.port, 1883);
        assert_eq!(config.retry.base_delay_secs, 5);
        assert!(config.retry.max_attempts.is_none());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config = BrokerviewConfig::load(Some("/nonexistent/brokerview.toml"))
            .expect("figment treats a missing file as empty");
        assert_eq!(config.gateway.port, DEFAULT_PORT);
        assert!(config.broker.username.is_none());
    }
}
