use chrono::Utc;
use serde::{Deserialize, Serialize};

/// One message observed on the broker, as shown on the dashboard.
/// Immutable once built; the store only ever evicts whole entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokerMessage {
    pub topic: String,
    pub payload: String,
    /// RFC 3339 receipt time.
    pub timestamp: String,
}

impl BrokerMessage {
    /// Build a message from a raw broker publish, stamped with the current
    /// time. A payload that is not valid UTF-8 is kept as its hex encoding
    /// rather than dropped.
    pub fn from_raw(topic: &str, payload: &[u8]) -> Self {
        Self {
            topic: topic.to_string(),
            payload: decode_payload(payload),
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    /// JSON frame pushed to every live dashboard client.
    pub fn to_event(&self) -> String {
        serde_json::json!({
            "event": "mqtt_message",
            "data": self,
        })
        .to_string()
    }
}

fn decode_payload(raw: &[u8]) -> String {
    match std::str::from_utf8(raw) {
        Ok(text) => text.to_string(),
        Err(_) => hex::encode(raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_payload_kept_verbatim() {
        let msg = BrokerMessage::from_raw("sensors/temp", "21.5".as_bytes());
        assert_eq!(msg.topic, "sensors/temp");
        assert_eq!(msg.payload, "21.5");
        assert!(!msg.timestamp.is_empty());
    }

    #[test]
    fn invalid_utf8_falls_back_to_hex() {
        let msg = BrokerMessage::from_raw("binary", &[0xff, 0xfe, 0x00, 0x41]);
        assert_eq!(msg.payload, "fffe0041");
    }

    #[test]
    fn event_frame_carries_all_fields() {
        let msg = BrokerMessage::from_raw("a/b", b"hi");
        let frame: serde_json::Value = serde_json::from_str(&msg.to_event()).unwrap();
        assert_eq!(frame["event"], "mqtt_message");
        assert_eq!(frame["data"]["topic"], "a/b");
        assert_eq!(frame["data"]["payload"], "hi");
        assert_eq!(frame["data"]["timestamp"], msg.timestamp);
    }
}
