use tokio::sync::broadcast;

const BROADCAST_CAPACITY: usize = 256;

/// Fan-out of message frames to all connected dashboard clients via a tokio
/// broadcast channel. Delivery is fire-and-forget: a slow client lags on its
/// own receiver and never blocks the others, and a client that subscribes
/// after a send never sees that frame.
pub struct EventBroadcaster {
    tx: broadcast::Sender<String>,
}

impl EventBroadcaster {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self { tx }
    }

    /// New client subscribes to the live stream.
    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.tx.subscribe()
    }

    /// Push a JSON frame to all current subscribers.
    /// Silently drops if no subscribers exist.
    pub fn send(&self, payload: String) {
        let _ = self.tx.send(payload);
    }
}

impl Default for EventBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}
