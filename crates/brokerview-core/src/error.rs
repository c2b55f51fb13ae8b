use thiserror::Error;

#[derive(Debug, Error)]
pub enum BrokerviewError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Broker error: {0}")]
    Broker(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Diagnostics error: {0}")]
    Diagnostics(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BrokerviewError {
    /// Short error code string returned in API error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            BrokerviewError::Config(_) => "CONFIG_ERROR",
            BrokerviewError::Broker(_) => "BROKER_ERROR",
            BrokerviewError::BadRequest(_) => "BAD_REQUEST",
            BrokerviewError::Diagnostics(_) => "DIAGNOSTICS_ERROR",
            BrokerviewError::Serialization(_) => "SERIALIZATION_ERROR",
            BrokerviewError::Io(_) => "IO_ERROR",
        }
    }
}

pub type Result<T> = std::result::Result<T, BrokerviewError>;
