//! Tracker engine: queue ownership, enrichment, and the size/time
//! dual-trigger flush policy.
//!
//! One engine serves the whole application. The composition root builds a
//! [`Tracker`] once and passes clones (the handle is an `Arc` around the
//! shared state) to every capture site.
//!
//! # Flush policy
//!
//! Evaluated once per capture, after the new event is appended:
//!
//! 1. queue length >= `batch_size`: dispatch a detached flush immediately,
//!    bypassing the timer.
//! 2. no timer pending: arm one for `flush_interval`; it flushes once and
//!    clears itself.
//! 3. timer already pending: nothing. The timer is never reset or
//!    duplicated, so the first event of a batch bounds its staleness.
//!
//! The dual trigger bounds both batch size and staleness with a single
//! timer slot, so high event rates cannot pile up timers.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tokio::task::AbortHandle;
use uuid::Uuid;

use crate::config::TrackerConfig;
use crate::context::ContextProvider;
use crate::error::Result;
use crate::event::{now_ms, EventDraft, EventType, LocationType, UserEvent};
use crate::sink::Sink;
use crate::transport::Transport;

/// Handle to the tracker engine. Cheap to clone; all clones share the
/// same queue, configuration, and counters.
#[derive(Clone)]
pub struct Tracker {
    inner: Arc<Inner>,
}

struct Inner {
    /// Configuration; only `batch_size` is written after construction.
    config: RwLock<TrackerConfig>,

    /// Queue and timer slot, mutated together under one lock.
    state: Mutex<EngineState>,

    transport: Transport,
    context: Arc<dyn ContextProvider>,
    sink: Arc<dyn Sink>,

    events_tracked: AtomicU64,
    batches_flushed: AtomicU64,
    events_flushed: AtomicU64,
}

#[derive(Default)]
struct EngineState {
    queue: VecDeque<UserEvent>,
    /// At most one flush timer is pending at a time.
    timer: Option<AbortHandle>,
}

/// Running counters, observability only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackerStats {
    /// Events accepted by `track_event`.
    pub events_tracked: u64,
    /// Flush invocations that produced a batch.
    pub batches_flushed: u64,
    /// Events handed to the transport across all batches.
    pub events_flushed: u64,
}

impl Tracker {
    /// Build the engine.
    ///
    /// Fails only on an invalid configuration (empty endpoint, zero batch
    /// size). Must be constructed and driven inside a tokio runtime: both
    /// flush triggers dispatch detached tasks.
    pub fn new(
        config: TrackerConfig,
        context: Arc<dyn ContextProvider>,
        sink: Arc<dyn Sink>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Tracker {
            inner: Arc::new(Inner {
                config: RwLock::new(config),
                state: Mutex::new(EngineState::default()),
                transport: Transport::new(),
                context,
                sink,
                events_tracked: AtomicU64::new(0),
                batches_flushed: AtomicU64::new(0),
                events_flushed: AtomicU64::new(0),
            }),
        })
    }

    /// Capture one interaction.
    ///
    /// Enriches the draft, appends it to the queue, and evaluates the
    /// flush policy. Synchronous and non-blocking: delivery, when
    /// triggered, runs on a detached task whose outcome is observed only
    /// by the diagnostic sink. Never fails the caller.
    pub fn track_event(&self, draft: EventDraft) {
        let event = self.enrich(draft);
        self.inner.events_tracked.fetch_add(1, Ordering::Relaxed);

        let (batch_size, flush_interval) = {
            let config = self.inner.config.read();
            (config.batch_size, config.flush_interval)
        };

        let mut state = self.inner.state.lock();
        state.queue.push_back(event);

        if state.queue.len() >= batch_size {
            drop(state);
            let engine = self.clone();
            tokio::spawn(async move {
                engine.flush_queue().await;
            });
        } else if state.timer.is_none() {
            let engine = self.clone();
            let handle = tokio::spawn(async move {
                tokio::time::sleep(flush_interval).await;
                // Free the slot before flushing; the timer fires once.
                engine.inner.state.lock().timer = None;
                engine.flush_queue().await;
            });
            state.timer = Some(handle.abort_handle());
        }
    }

    /// Flush the current queue prefix (up to `batch_size` events).
    ///
    /// No-op on an empty queue. The prefix is removed before delivery
    /// begins and is not restored on failure: delivery is best-effort and
    /// at-most-once. Taking the prefix under the state lock makes removal
    /// and delivery one logical unit per invocation, so concurrent flushes
    /// can never deliver the same event twice. Cancels any pending timer.
    pub async fn flush_queue(&self) {
        let batch = {
            let batch_size = self.inner.config.read().batch_size;
            let mut state = self.inner.state.lock();
            if state.queue.is_empty() {
                return;
            }
            if let Some(timer) = state.timer.take() {
                timer.abort();
            }
            let take = state.queue.len().min(batch_size);
            state.queue.drain(..take).collect::<Vec<_>>()
        };

        self.inner.batches_flushed.fetch_add(1, Ordering::Relaxed);
        self.inner
            .events_flushed
            .fetch_add(batch.len() as u64, Ordering::Relaxed);

        let config = self.inner.config.read().clone();
        self.inner
            .transport
            .deliver(&batch, &config, self.inner.sink.as_ref())
            .await;
    }

    /// Discard every queued event and cancel any pending timer.
    /// No delivery attempt is made.
    pub fn clear_queue(&self) {
        let mut state = self.inner.state.lock();
        state.queue.clear();
        if let Some(timer) = state.timer.take() {
            timer.abort();
        }
    }

    /// Current queue length.
    pub fn queue_size(&self) -> usize {
        self.inner.state.lock().queue.len()
    }

    /// Change the batch size threshold.
    ///
    /// Takes effect on the next capture's policy evaluation; the existing
    /// queue is not re-checked. Zero is ignored.
    pub fn set_batch_size(&self, size: usize) {
        if size == 0 {
            log::warn!("ignoring zero batch size");
            return;
        }
        self.inner.config.write().batch_size = size;
    }

    /// Snapshot of the running counters.
    pub fn stats(&self) -> TrackerStats {
        TrackerStats {
            events_tracked: self.inner.events_tracked.load(Ordering::Relaxed),
            batches_flushed: self.inner.batches_flushed.load(Ordering::Relaxed),
            events_flushed: self.inner.events_flushed.load(Ordering::Relaxed),
        }
    }

    /// Turn a draft into a full event. The ambient fields always come
    /// from the engine, never from the caller.
    fn enrich(&self, draft: EventDraft) -> UserEvent {
        let page = self.inner.context.current();
        UserEvent {
            timestamp: now_ms(),
            event_id: Uuid::new_v4().to_string(),
            event_type: draft.event_type.unwrap_or(EventType::Unknown),
            location_type: draft.location_type.unwrap_or(LocationType::Page),
            component_name: draft.component_name,
            page_path: page.path,
            page_title: page.title,
            dom_info: draft.dom_info,
            user_metadata: draft.user_metadata,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::AppContext;
    use crate::error::TrackerError;
    use crate::sink::MemorySink;
    use std::collections::HashSet;
    use std::time::Duration;

    fn test_tracker(batch_size: usize, flush_interval_ms: u64) -> (Tracker, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        let context = Arc::new(AppContext::new("/home", "Home"));
        let config = TrackerConfig {
            endpoint_url: "http://localhost/api/track".to_string(),
            batch_size,
            flush_interval: Duration::from_millis(flush_interval_ms),
            app_name: "TestApp".to_string(),
            app_version: "0.1.0".to_string(),
            debug: true,
            log: false,
        };
        let tracker = Tracker::new(config, context, sink.clone()).unwrap();
        (tracker, sink)
    }

    async fn wait_for(mut cond: impl FnMut() -> bool) {
        for _ in 0..200 {
            if cond() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
        panic!("condition not met in time");
    }

    #[test]
    fn construction_rejects_invalid_config() {
        let config = TrackerConfig {
            batch_size: 0,
            ..TrackerConfig::default()
        };
        let result = Tracker::new(
            config,
            Arc::new(AppContext::default()),
            Arc::new(MemorySink::new()),
        );
        assert!(matches!(result, Err(TrackerError::InvalidConfig(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn queue_size_counts_captures_until_threshold() {
        let (tracker, sink) = test_tracker(5, 60_000);

        for expected in 1..=4 {
            tracker.track_event(EventDraft::component(EventType::Click, "Btn"));
            assert_eq!(tracker.queue_size(), expected);
        }
        assert!(sink.batches().is_empty());

        tracker.track_event(EventDraft::component(EventType::Click, "Btn"));
        wait_for(|| sink.batches().len() == 1).await;
        assert_eq!(tracker.queue_size(), 0);
        assert_eq!(sink.batches()[0].len(), 5);
    }

    #[tokio::test]
    async fn enrichment_assigns_ambient_fields() {
        let (tracker, sink) = test_tracker(10, 60_000);

        tracker.track_event(EventDraft::component(EventType::Click, "Btn"));
        tracker.track_event(EventDraft::component(EventType::Click, "Btn"));
        tracker.flush_queue().await;

        let batch = &sink.batches()[0];
        assert_eq!(batch.len(), 2);
        for event in batch {
            assert_eq!(event.event_type, EventType::Click);
            assert_eq!(event.location_type, LocationType::Component);
            assert_eq!(event.component_name.as_deref(), Some("Btn"));
            assert!(!event.event_id.is_empty());
            assert!(event.timestamp > 0);
            assert_eq!(event.page_path, "/home");
            assert_eq!(event.page_title, "Home");
        }

        let ids: HashSet<_> = batch.iter().map(|e| e.event_id.clone()).collect();
        assert_eq!(ids.len(), 2, "event ids must be unique");
    }

    #[tokio::test]
    async fn empty_draft_gets_defaults() {
        let (tracker, sink) = test_tracker(10, 60_000);

        tracker.track_event(EventDraft::default());
        tracker.flush_queue().await;

        let event = &sink.batches()[0][0];
        assert_eq!(event.event_type, EventType::Unknown);
        assert_eq!(event.location_type, LocationType::Page);
        assert!(event.component_name.is_none());
        assert!(event.user_metadata.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn batch_size_trigger_flushes_without_interval() {
        let (tracker, sink) = test_tracker(2, 60_000);

        tracker.track_event(EventDraft::component(EventType::Click, "Btn"));
        tracker.track_event(EventDraft::component(EventType::HoverEnter, "Btn"));

        // Well before the 60s interval.
        wait_for(|| sink.batches().len() == 1).await;
        assert_eq!(sink.batches()[0].len(), 2);
        assert_eq!(tracker.queue_size(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn interval_trigger_flushes_exactly_once() {
        let (tracker, sink) = test_tracker(2, 100);

        tracker.track_event(EventDraft::component(EventType::Click, "Btn"));
        assert_eq!(tracker.queue_size(), 1);
        assert!(sink.batches().is_empty());

        tokio::time::sleep(Duration::from_millis(150)).await;
        wait_for(|| sink.batches().len() == 1).await;
        assert_eq!(sink.batches()[0].len(), 1);
        assert_eq!(tracker.queue_size(), 0);

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(sink.batches().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn pending_timer_is_not_reset_by_later_captures() {
        let (tracker, sink) = test_tracker(10, 100);

        tracker.track_event(EventDraft::page(EventType::PageView));
        tokio::time::sleep(Duration::from_millis(50)).await;
        tracker.track_event(EventDraft::page(EventType::PageView));

        // Fires 100ms after the first capture, not the second: a reset
        // timer would still be pending at 110ms.
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(sink.batches().len(), 1);
        assert_eq!(sink.batches()[0].len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn clear_queue_cancels_pending_timer() {
        let (tracker, sink) = test_tracker(10, 100);

        tracker.track_event(EventDraft::component(EventType::Click, "Btn"));
        tracker.track_event(EventDraft::component(EventType::Click, "Btn"));
        assert_eq!(tracker.queue_size(), 2);

        tracker.clear_queue();
        assert_eq!(tracker.queue_size(), 0);

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(sink.batches().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn set_batch_size_applies_to_future_captures_only() {
        let (tracker, sink) = test_tracker(5, 60_000);

        tracker.track_event(EventDraft::component(EventType::Click, "Btn"));
        tracker.set_batch_size(1);

        // No retroactive flush check on the existing queue.
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(sink.batches().is_empty());
        assert_eq!(tracker.queue_size(), 1);

        // The next capture evaluates against the new threshold and takes
        // a prefix of the new size.
        tracker.track_event(EventDraft::component(EventType::Click, "Btn"));
        wait_for(|| sink.batches().len() == 1).await;
        assert_eq!(sink.batches()[0].len(), 1);
        assert_eq!(tracker.queue_size(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_batch_size_is_ignored() {
        let (tracker, sink) = test_tracker(5, 60_000);

        tracker.set_batch_size(0);
        tracker.track_event(EventDraft::component(EventType::Click, "Btn"));

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(tracker.queue_size(), 1);
        assert!(sink.batches().is_empty());
    }

    #[tokio::test]
    async fn flush_on_empty_queue_is_noop() {
        let (tracker, sink) = test_tracker(5, 60_000);

        tracker.flush_queue().await;

        assert!(sink.batches().is_empty());
        assert_eq!(tracker.stats().batches_flushed, 0);
    }

    #[tokio::test]
    async fn concurrent_flushes_never_deliver_twice() {
        let (tracker, sink) = test_tracker(100, 60_000);

        for _ in 0..4 {
            tracker.track_event(EventDraft::component(EventType::Click, "Btn"));
        }
        tracker.set_batch_size(2);
        tokio::join!(tracker.flush_queue(), tracker.flush_queue());

        let delivered: Vec<_> = sink.batches().into_iter().flatten().collect();
        assert_eq!(delivered.len(), 4);
        let ids: HashSet<_> = delivered.iter().map(|e| e.event_id.clone()).collect();
        assert_eq!(ids.len(), 4, "no event may be delivered twice");
        assert_eq!(tracker.queue_size(), 0);
    }

    #[tokio::test]
    async fn stats_count_tracked_and_flushed() {
        let (tracker, _sink) = test_tracker(10, 60_000);

        for _ in 0..3 {
            tracker.track_event(EventDraft::page(EventType::PageView));
        }
        tracker.flush_queue().await;

        let stats = tracker.stats();
        assert_eq!(stats.events_tracked, 3);
        assert_eq!(stats.batches_flushed, 1);
        assert_eq!(stats.events_flushed, 3);
    }
}
