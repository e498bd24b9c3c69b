//! Diagnostic sink: local visibility channel for batches, responses, and
//! delivery failures. Distinct from the network transport: debug and log
//! modes route through here instead of (or in addition to) the wire.

use parking_lot::Mutex;

use crate::event::UserEvent;

/// Local diagnostic output channel.
pub trait Sink: Send + Sync {
    /// A batch surfaced for debug/log visibility.
    fn batch(&self, events: &[UserEvent]);

    /// Response body text received from the endpoint.
    fn response(&self, body: &str);

    /// A network-level delivery failure.
    fn failure(&self, error: &str);
}

/// Default sink: forwards to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl Sink for LogSink {
    fn batch(&self, events: &[UserEvent]) {
        log::debug!(
            "batch of {} events: {}",
            events.len(),
            serde_json::to_string(events).unwrap_or_default()
        );
    }

    fn response(&self, body: &str) {
        log::debug!("endpoint response: {}", body);
    }

    fn failure(&self, error: &str) {
        log::error!("failed to send batch: {}", error);
    }
}

/// In-memory sink recording everything it sees.
///
/// Used by tests and the demo to observe delivery without a backend.
#[derive(Debug, Default)]
pub struct MemorySink {
    batches: Mutex<Vec<Vec<UserEvent>>>,
    responses: Mutex<Vec<String>>,
    failures: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        MemorySink::default()
    }

    /// Batches surfaced so far, oldest first.
    pub fn batches(&self) -> Vec<Vec<UserEvent>> {
        self.batches.lock().clone()
    }

    /// Response bodies surfaced so far.
    pub fn responses(&self) -> Vec<String> {
        self.responses.lock().clone()
    }

    /// Delivery failures surfaced so far.
    pub fn failures(&self) -> Vec<String> {
        self.failures.lock().clone()
    }
}

impl Sink for MemorySink {
    fn batch(&self, events: &[UserEvent]) {
        self.batches.lock().push(events.to_vec());
    }

    fn response(&self, body: &str) {
        self.responses.lock().push(body.to_string());
    }

    fn failure(&self, error: &str) {
        self.failures.lock().push(error.to_string());
    }
}
