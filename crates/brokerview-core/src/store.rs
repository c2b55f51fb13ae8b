//! Bounded in-memory store of everything the dashboard shows: the last 100
//! broker messages, every topic ever seen, the connect counter, and the
//! error ring. One mutex guards the whole thing so `snapshot()` is atomic
//! with respect to concurrent appends from the broker link.

use std::collections::{BTreeSet, VecDeque};
use std::sync::Mutex;

use serde::Serialize;
use tokio::sync::broadcast;

use crate::broadcast::EventBroadcaster;
use crate::config::{ERROR_LOG_CAP, MESSAGE_HISTORY_CAP};
use crate::message::BrokerMessage;

pub struct EventStore {
    inner: Mutex<StoreInner>,
    broadcaster: EventBroadcaster,
}

#[derive(Default)]
struct StoreInner {
    messages: VecDeque<BrokerMessage>,
    topics: BTreeSet<String>,
    connection_count: u64,
    errors: VecDeque<String>,
}

/// Atomic read-only view handed to the stats and messages endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct StoreSnapshot {
    pub recent_messages: Vec<BrokerMessage>,
    pub topics: Vec<String>,
    pub connection_count: u64,
    pub errors: Vec<String>,
}

impl EventStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(StoreInner::default()),
            broadcaster: EventBroadcaster::new(),
        }
    }

    /// Record one broker message: push into the ring (evicting the oldest
    /// past the cap), remember its topic, then fan the frame out to every
    /// live client before returning.
    pub fn append(&self, message: BrokerMessage) {
        let frame = message.to_event();
        {
            let mut inner = self.lock();
            inner.topics.insert(message.topic.clone());
            inner.messages.push_back(message);
            while inner.messages.len() > MESSAGE_HISTORY_CAP {
                inner.messages.pop_front();
            }
        }
        self.broadcaster.send(frame);
    }

    /// Successful broker connect.
    pub fn record_connected(&self) {
        self.lock().connection_count += 1;
    }

    /// Broker disconnect; the counter never goes below zero.
    pub fn record_disconnected(&self) {
        let mut inner = self.lock();
        inner.connection_count = inner.connection_count.saturating_sub(1);
    }

    /// Append to the error ring, evicting the oldest entry past the cap.
    pub fn record_error(&self, text: impl Into<String>) {
        let mut inner = self.lock();
        inner.errors.push_back(text.into());
        while inner.errors.len() > ERROR_LOG_CAP {
            inner.errors.pop_front();
        }
    }

    /// New live client subscribes to the message stream. History is not
    /// replayed; late joiners fetch it via `snapshot()`.
    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.broadcaster.subscribe()
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        let inner = self.lock();
        StoreSnapshot {
            recent_messages: inner.messages.iter().cloned().collect(),
            topics: inner.topics.iter().cloned().collect(),
            connection_count: inner.connection_count,
            errors: inner.errors.iter().cloned().collect(),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StoreInner> {
        // A poisoned lock only means another thread panicked mid-update;
        // the stored data is still usable for a dashboard.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for EventStore {
    fn default() -> Self {
        Self::new()
    }
}
