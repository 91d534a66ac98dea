//! Info/status sink: one-way, fire-and-forget status strings

use parking_lot::Mutex;

/// Receives human-readable status strings (selection counts, operation
/// outcomes). Implementations must never block the caller.
pub trait InfoSink: Send + Sync {
    fn update(&self, message: &str);
}

/// Sink that forwards status lines to the tracing log
#[derive(Debug, Default)]
pub struct LogInfoSink;

impl InfoSink for LogInfoSink {
    fn update(&self, message: &str) {
        tracing::info!("{}", message);
    }
}

/// Sink that records every status line, for tests and headless shells
#[derive(Debug, Default)]
pub struct MemoryInfoSink {
    messages: Mutex<Vec<String>>,
}

impl MemoryInfoSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent status line, if any
    pub fn last(&self) -> Option<String> {
        self.messages.lock().last().cloned()
    }

    /// All status lines in arrival order
    pub fn all(&self) -> Vec<String> {
        self.messages.lock().clone()
    }
}

impl InfoSink for MemoryInfoSink {
    fn update(&self, message: &str) {
        self.messages.lock().push(message.to_string());
    }
}
