use log::info;
use parking_lot::Mutex;

// @module: Progress reporting for long-running jobs

/// Receiver for human-readable progress messages emitted while a job runs.
///
/// Implementations must be thread-safe: the job may run on a blocking
/// worker thread while the consumer lives elsewhere.
pub trait ProgressSink: Send + Sync {
    // @param: message - Progress text ready for display
    fn notify(&self, message: &str);
}

/// Sink that forwards progress messages to the application log.
pub struct LogSink;

impl ProgressSink for LogSink {
    fn notify(&self, message: &str) {
        info!("{}", message);
    }
}

/// Sink that records every message in memory, mainly for tests.
#[derive(Default)]
pub struct MemorySink {
    messages: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the messages received so far, in order.
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }
}

impl ProgressSink for MemorySink {
    fn notify(&self, message: &str) {
        self.messages.lock().push(message.to_string());
    }
}
