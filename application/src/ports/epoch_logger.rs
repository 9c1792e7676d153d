//! Port for structured per-epoch logging.
//!
//! Defines the [`EpochLogger`] trait for recording solver events (answered
//! rounds, feedback results, final statistics) to a structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures the run in a
//! machine-readable format (JSONL).

use serde_json::Value;

/// A structured solver event for logging.
pub struct EpochEvent {
    /// Event type identifier (e.g., "round_answered", "feedback", "finished").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl EpochEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging solver events to a structured log.
///
/// `log` is synchronous and infallible; implementations drop records they
/// cannot write.
pub trait EpochLogger: Send + Sync {
    fn log(&self, event: EpochEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoEpochLogger;

impl EpochLogger for NoEpochLogger {
    fn log(&self, _event: EpochEvent) {}
}
