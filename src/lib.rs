//! # user-tracker
//!
//! Client-side user-interaction telemetry collector: capture UI events
//! (clicks, hovers, page views), batch them, and deliver them to a backend
//! endpoint with bounded latency and minimal overhead.
//!
//! # Architecture
//!
//! - **event**: the enriched event model and caller-facing drafts
//! - **context**: injectable provider of the ambient page context
//! - **sink**: local diagnostic channel for debug/log visibility
//! - **transport**: single-attempt HTTP batch delivery
//! - **tracker**: the engine: queue, enrichment, dual-trigger flush policy
//! - **capture**: bindings from UI interaction signals to capture calls
//!
//! Delivery is best-effort and at-most-once: a flushed batch is removed
//! from the queue whether or not the attempt succeeds, and a transport
//! failure is only ever visible through the sink. Telemetry must never
//! interfere with the host application.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use tracker::{AppContext, ComponentHandlers, LogSink, Tracker, TrackerConfig};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), tracker::TrackerError> {
//! let context = Arc::new(AppContext::new("/", "Home"));
//! let tracker = Tracker::new(
//!     TrackerConfig {
//!         endpoint_url: "https://collector.example.com/api/track".to_string(),
//!         batch_size: 50,
//!         flush_interval: Duration::from_secs(5),
//!         app_name: "MyApp".to_string(),
//!         app_version: "1.0.0".to_string(),
//!         debug: false,
//!         log: false,
//!     },
//!     context.clone(),
//!     Arc::new(LogSink),
//! )?;
//!
//! let buy_button = ComponentHandlers::new(tracker.clone(), "BuyButton");
//! buy_button.on_click();
//!
//! context.navigate("/shop", "Shop");
//! tracker.flush_queue().await;
//! # Ok(())
//! # }
//! ```

pub mod capture;
pub mod config;
pub mod context;
pub mod error;
pub mod event;
pub mod sink;
pub mod tracker;
pub mod transport;

pub use capture::{track_page_view, ComponentHandlers, PageListener};
pub use config::TrackerConfig;
pub use context::{AppContext, ContextProvider, PageContext};
pub use error::{Result, TrackerError};
pub use event::{DomInfo, EventDraft, EventType, LocationType, UserEvent};
pub use sink::{LogSink, MemorySink, Sink};
pub use tracker::{Tracker, TrackerStats};
pub use transport::{BatchEnvelope, Transport};

/// Crate version, attached by hosts that report their tracker build.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
