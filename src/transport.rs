//! Single-attempt batch delivery.
//!
//! The transport performs exactly one POST per batch and never fails
//! outward: debug mode short-circuits to the sink, HTTP status codes are
//! not inspected, and network-level failures are contained here and
//! surfaced only through the sink. Retries are the backend's problem.

use serde::Serialize;

use crate::config::TrackerConfig;
use crate::event::UserEvent;
use crate::sink::Sink;

/// Envelope POSTed to the collector endpoint.
#[derive(Debug, Serialize)]
pub struct BatchEnvelope<'a> {
    pub events: &'a [UserEvent],
    #[serde(rename = "appName")]
    pub app_name: &'a str,
    #[serde(rename = "appVersion")]
    pub app_version: &'a str,
}

/// Stateless delivery around a shared HTTP client.
#[derive(Debug, Clone, Default)]
pub struct Transport {
    client: reqwest::Client,
}

impl Transport {
    pub fn new() -> Self {
        Transport {
            client: reqwest::Client::new(),
        }
    }

    /// Perform one delivery attempt for `batch`.
    ///
    /// - `config.debug`: route the batch to the sink, no network I/O.
    /// - `config.log`: route the batch to the sink before delivery and the
    ///   response body after.
    /// - Any received response counts as delivered, whatever its status.
    /// - A request that never completes is reported to the sink at error
    ///   level; the failure never propagates to the caller.
    pub async fn deliver(&self, batch: &[UserEvent], config: &TrackerConfig, sink: &dyn Sink) {
        if config.debug {
            sink.batch(batch);
            return;
        }
        if config.log {
            sink.batch(batch);
        }

        let envelope = BatchEnvelope {
            events: batch,
            app_name: &config.app_name,
            app_version: &config.app_version,
        };

        match self
            .client
            .post(&config.endpoint_url)
            .json(&envelope)
            .send()
            .await
        {
            Ok(response) => {
                if config.log {
                    match response.text().await {
                        Ok(body) => sink.response(&body),
                        Err(e) => sink.failure(&e.to_string()),
                    }
                }
            }
            Err(e) => sink.failure(&e.to_string()),
        }
    }
}
