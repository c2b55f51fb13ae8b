//! Debug-bar diagnostics: a fixed set of named panels, each a key -> last
//! recorded value map. Advisory only — best-effort, never fatal, and may be
//! observed out of order relative to the event store.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use serde_json::Value;

/// Panels are fixed at startup; `record` against any other name is ignored.
pub const PANELS: [&str; 3] = ["mqtt", "request", "performance"];

pub struct DiagnosticsRecorder {
    panels: Mutex<BTreeMap<String, BTreeMap<String, Value>>>,
    enabled: AtomicBool,
}

impl DiagnosticsRecorder {
    pub fn new() -> Self {
        let panels = PANELS
            .iter()
            .map(|name| (name.to_string(), BTreeMap::new()))
            .collect();
        Self {
            panels: Mutex::new(panels),
            enabled: AtomicBool::new(true),
        }
    }

    /// Overwrite-on-write: the panel keeps only the last value per key.
    /// A no-op while disabled, so callers never need to check the flag.
    pub fn record(&self, panel: &str, key: &str, value: Value) {
        if !self.is_enabled() {
            return;
        }
        let mut panels = self.lock();
        match panels.get_mut(panel) {
            Some(entries) => {
                entries.insert(key.to_string(), value);
            }
            None => tracing::debug!(panel, key, "record against unknown panel ignored"),
        }
    }

    /// Delete a key if present; no-op otherwise. Works even while disabled
    /// so stale facts can still be cleared.
    pub fn remove(&self, panel: &str, key: &str) {
        let mut panels = self.lock();
        if let Some(panel) = panels.get_mut(panel) {
            panel.remove(key);
        }
    }

    /// Atomic nested snapshot of all panels.
    pub fn data(&self) -> BTreeMap<String, BTreeMap<String, Value>> {
        self.lock().clone()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    pub fn enable(&self) {
        self.enabled.store(true, Ordering::Relaxed);
    }

    pub fn disable(&self) {
        self.enabled.store(false, Ordering::Relaxed);
    }

    /// Flip the enabled flag and return the new value.
    pub fn toggle(&self) -> bool {
        !self.enabled.fetch_xor(true, Ordering::Relaxed)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, BTreeMap<String, Value>>> {
        self.panels.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for DiagnosticsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_overwrites_previous_value() {
        let diag = DiagnosticsRecorder::new();
        diag.record("mqtt", "status", json!("connecting"));
        diag.record("mqtt", "status", json!("connected"));
        assert_eq!(diag.data()["mqtt"]["status"], json!("connected"));
    }

    #[test]
    fn unknown_panel_is_ignored() {
        let diag = DiagnosticsRecorder::new();
        diag.record("no-such-panel", "key", json!(1));
        assert!(!diag.data().contains_key("no-such-panel"));
    }

    #[test]
    fn remove_is_noop_for_missing_key() {
        let diag = DiagnosticsRecorder::new();
        diag.record("request", "path", json!("/stats"));
        diag.remove("request", "path");
        diag.remove("request", "path");
        assert!(diag.data()["request"].is_empty());
    }

    #[test]
    fn record_is_noop_while_disabled() {
        let diag = DiagnosticsRecorder::new();
        diag.disable();
        diag.record("mqtt", "status", json!("connected"));
        assert!(diag.data()["mqtt"].is_empty());

        diag.enable();
        diag.record("mqtt", "status", json!("connected"));
        assert_eq!(diag.data()["mqtt"]["status"], json!("connected"));
    }

    #[test]
    fn toggle_returns_new_state() {
        let diag = DiagnosticsRecorder::new();
        assert!(diag.is_enabled());
        assert!(!diag.toggle());
        assert!(!diag.is_enabled());
        assert!(diag.toggle());
        assert!(diag.is_enabled());
    }
}
