//! Run progress events
//!
//! A run publishes an ordered, append-only stream of events. Every run ends
//! with exactly one terminal event (completed, failed, or stopped), and only
//! terminal events carry `is_finished = true`. The constructors here are the
//! only way to build events, which keeps that invariant out of callers'
//! hands.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What kind of progress an event reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// Run accepted; work begins
    Started,

    /// Intermediate progress with accumulated output
    Progress,

    /// Run finished successfully
    Completed,

    /// Run ended on a fatal error
    Failed,

    /// Run halted at a cancellation checkpoint
    Stopped,
}

/// One entry in a run's event stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunEvent {
    /// Event kind
    pub kind: EventKind,

    /// Human-readable status line
    pub message: String,

    /// Structured payload (accumulated records, iteration counters)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,

    /// Terminal marker; true exactly once per run
    pub is_finished: bool,
}

impl RunEvent {
    /// Run accepted
    pub fn started(message: impl Into<String>) -> Self {
        Self {
            kind: EventKind::Started,
            message: message.into(),
            payload: None,
            is_finished: false,
        }
    }

    /// Intermediate progress
    pub fn progress(message: impl Into<String>, payload: Value) -> Self {
        Self {
            kind: EventKind::Progress,
            message: message.into(),
            payload: Some(payload),
            is_finished: false,
        }
    }

    /// Successful terminal event
    pub fn completed(message: impl Into<String>, payload: Value) -> Self {
        Self {
            kind: EventKind::Completed,
            message: message.into(),
            payload: Some(payload),
            is_finished: true,
        }
    }

    /// Fatal-error terminal event
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            kind: EventKind::Failed,
            message: message.into(),
            payload: None,
            is_finished: true,
        }
    }

    /// Cancellation terminal event
    pub fn stopped(message: impl Into<String>, payload: Value) -> Self {
        Self {
            kind: EventKind::Stopped,
            message: message.into(),
            payload: Some(payload),
            is_finished: true,
        }
    }

    /// Whether this event ends its run's stream
    pub fn is_terminal(&self) -> bool {
        self.is_finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_only_terminal_events_finish() {
        assert!(!RunEvent::started("run accepted").is_terminal());
        assert!(!RunEvent::progress("batch done", json!({"iteration": 1})).is_terminal());
        assert!(RunEvent::completed("done", json!({"records": []})).is_terminal());
        assert!(RunEvent::failed("No Data Found.").is_terminal());
        assert!(RunEvent::stopped("stop requested", json!({"records": []})).is_terminal());
    }

    #[test]
    fn test_kind_matches_constructor() {
        assert_eq!(RunEvent::started("x").kind, EventKind::Started);
        assert_eq!(RunEvent::failed("x").kind, EventKind::Failed);
        assert_eq!(
            RunEvent::stopped("x", Value::Null).kind,
            EventKind::Stopped
        );
    }

    #[test]
    fn test_event_wire_shape() {
        let event = RunEvent::progress("extracted 4 records", json!({"iteration": 2}));
        let wire = serde_json::to_value(&event).unwrap();

        assert_eq!(wire["kind"], "progress");
        assert_eq!(wire["is_finished"], false);
        assert_eq!(wire["payload"]["iteration"], 2);

        let back: RunEvent = serde_json::from_value(wire).unwrap();
        assert_eq!(back, event);
    }
}
