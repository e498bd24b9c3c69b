//! Tracker configuration.

use std::time::Duration;

use crate::error::{Result, TrackerError};

/// Configuration for the tracker engine.
///
/// Supplied once at construction. Only `batch_size` is mutable afterward,
/// via `Tracker::set_batch_size`.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Delivery target for event batches.
    pub endpoint_url: String,

    /// Queue length that triggers an immediate flush. Must be > 0.
    pub batch_size: usize,

    /// Maximum time a captured event waits before a time-based flush.
    pub flush_interval: Duration,

    /// Application name attached to every batch envelope.
    pub app_name: String,

    /// Application version attached to every batch envelope.
    pub app_version: String,

    /// When true, batches are never transmitted; they only reach the sink.
    pub debug: bool,

    /// When true, batches and transport responses are surfaced to the sink
    /// in addition to normal delivery.
    pub log: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        TrackerConfig {
            endpoint_url: "http://localhost:8000/api/track".to_string(),
            batch_size: 20,
            flush_interval: Duration::from_secs(5),
            app_name: "app".to_string(),
            app_version: "0.0.0".to_string(),
            debug: false,
            log: false,
        }
    }
}

impl TrackerConfig {
    /// Validate construction-time invariants.
    pub fn validate(&self) -> Result<()> {
        if self.endpoint_url.is_empty() {
            return Err(TrackerError::InvalidConfig(
                "endpoint_url must not be empty".to_string(),
            ));
        }
        if self.batch_size == 0 {
            return Err(TrackerError::InvalidConfig(
                "batch_size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
