//! Core state for the brokerview dashboard: the bounded message store, the
//! fan-out broadcaster, the debug-bar diagnostics panels, and the shared
//! config/error types. This crate performs no I/O — the gateway feeds it
//! broker events and reads snapshots back out.

pub mod broadcast;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod message;
pub mod store;

pub use broadcast::EventBroadcaster;
pub use config::BrokerviewConfig;
pub use diagnostics::DiagnosticsRecorder;
pub use error::{BrokerviewError, Result};
pub use message::BrokerMessage;
pub use store::{EventStore, StoreSnapshot};
