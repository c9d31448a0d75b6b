//! Port for the structured run transcript.
//!
//! Defines the [`RunLogger`] trait for recording what happened during a run
//! (planner requests and replies, task dispatches, step results, the
//! outcome) to a machine-readable log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures the full
//! transcript (JSONL).

use serde_json::Value;

/// A structured run event.
pub struct RunEvent {
    /// Event type identifier (e.g., "planner_request", "task_result").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl RunEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging run events.
///
/// `log` is synchronous and non-fallible; logging failures never disturb
/// the run.
pub trait RunLogger: Send + Sync {
    fn log(&self, event: RunEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoRunLogger;

impl RunLogger for NoRunLogger {
    fn log(&self, _event: RunEvent) {}
}
