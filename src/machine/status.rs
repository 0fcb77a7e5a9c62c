//! Operator-facing status messages.

use parking_lot::Mutex;
use std::time::Duration;

/// How long status messages raised by state machines stay visible.
pub const STATUS_MESSAGE_DURATION: Duration = Duration::from_millis(10_000);

/// Fire-and-forget channel for human-readable diagnostics.
pub trait StatusSink: Send + Sync {
    fn display_text(&self, message: &str, duration: Duration);
}

/// Forwards status messages to `tracing` at warn level.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingStatusSink;

impl StatusSink for TracingStatusSink {
    fn display_text(&self, message: &str, duration: Duration) {
        tracing::warn!(duration_ms = duration.as_millis() as u64, "{message}");
    }
}

/// Keeps every message in memory. Useful for hosts that poll, and in tests.
#[derive(Debug, Default)]
pub struct MemoryStatusSink {
    messages: Mutex<Vec<String>>,
}

impl MemoryStatusSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.messages.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.lock().is_empty()
    }

    pub fn clear(&self) {
        self.messages.lock().clear();
    }
}

impl StatusSink for MemoryStatusSink {
    fn display_text(&self, message: &str, _duration: Duration) {
        self.messages.lock().push(message.to_string());
    }
}
