//! Error types for the tracker crate.
//!
//! Only construction can fail. Everything past `Tracker::new` is
//! best-effort, with delivery failures contained at the transport
//! boundary and surfaced through the diagnostic sink.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("invalid tracker configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, TrackerError>;
