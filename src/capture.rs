//! Capture bindings: adapters from UI interaction signals to engine
//! capture calls.
//!
//! Two binding styles mirror how host UIs are wired. Component-scoped
//! bindings are a handler triple closed over a fixed component name,
//! attached to one element's interaction hooks. The page-global binding is
//! a single document-level click listener fed the interaction target's
//! DOM metadata by the host layer.

use std::collections::HashMap;

use crate::event::{DomInfo, EventDraft, EventType, LocationType};
use crate::tracker::Tracker;

/// Handler triple for one UI component.
///
/// Attach `on_click` / `on_hover_enter` / `on_hover_leave` to the
/// element's interaction hooks; every capture is a `COMPONENT`-located
/// event carrying the fixed component name.
#[derive(Clone)]
pub struct ComponentHandlers {
    tracker: Tracker,
    component_name: String,
    base_metadata: HashMap<String, serde_json::Value>,
}

impl ComponentHandlers {
    pub fn new(tracker: Tracker, component_name: impl Into<String>) -> Self {
        ComponentHandlers {
            tracker,
            component_name: component_name.into(),
            base_metadata: HashMap::new(),
        }
    }

    /// Merge `metadata` into every event this binding captures.
    pub fn with_metadata(
        tracker: Tracker,
        component_name: impl Into<String>,
        metadata: HashMap<String, serde_json::Value>,
    ) -> Self {
        ComponentHandlers {
            tracker,
            component_name: component_name.into(),
            base_metadata: metadata,
        }
    }

    pub fn on_click(&self) {
        self.capture(EventType::Click);
    }

    pub fn on_hover_enter(&self) {
        self.capture(EventType::HoverEnter);
    }

    pub fn on_hover_leave(&self) {
        self.capture(EventType::HoverLeave);
    }

    fn capture(&self, event_type: EventType) {
        self.tracker.track_event(EventDraft {
            event_type: Some(event_type),
            location_type: Some(LocationType::Component),
            component_name: Some(self.component_name.clone()),
            user_metadata: self.base_metadata.clone(),
            ..EventDraft::default()
        });
    }
}

/// Document-global click listener.
///
/// The host UI layer installs one listener for the whole document and
/// forwards each click target's DOM metadata here.
#[derive(Clone)]
pub struct PageListener {
    tracker: Tracker,
}

impl PageListener {
    pub fn new(tracker: Tracker) -> Self {
        PageListener { tracker }
    }

    /// Capture a page-level click on `target`.
    pub fn on_document_click(&self, target: DomInfo) {
        self.tracker.track_event(EventDraft {
            event_type: Some(EventType::Click),
            location_type: Some(LocationType::Page),
            dom_info: Some(target),
            ..EventDraft::default()
        });
    }
}

/// Capture a `PAGE_VIEW` at the current context location.
///
/// Hosts call this on every navigation, after updating their context
/// provider.
pub fn track_page_view(tracker: &Tracker) {
    tracker.track_event(EventDraft::page(EventType::PageView));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrackerConfig;
    use crate::context::AppContext;
    use crate::sink::MemorySink;
    use std::sync::Arc;
    use std::time::Duration;

    fn test_tracker() -> (Tracker, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        let config = TrackerConfig {
            batch_size: 100,
            flush_interval: Duration::from_secs(60),
            debug: true,
            ..TrackerConfig::default()
        };
        let tracker = Tracker::new(
            config,
            Arc::new(AppContext::new("/docs", "Docs")),
            sink.clone(),
        )
        .unwrap();
        (tracker, sink)
    }

    #[tokio::test]
    async fn component_handlers_emit_the_triple() {
        let (tracker, sink) = test_tracker();
        let handlers = ComponentHandlers::new(tracker.clone(), "BuyButton");

        handlers.on_click();
        handlers.on_hover_enter();
        handlers.on_hover_leave();
        tracker.flush_queue().await;

        let batch = &sink.batches()[0];
        let types: Vec<_> = batch.iter().map(|e| e.event_type.clone()).collect();
        assert_eq!(
            types,
            vec![
                EventType::Click,
                EventType::HoverEnter,
                EventType::HoverLeave
            ]
        );
        for event in batch {
            assert_eq!(event.location_type, LocationType::Component);
            assert_eq!(event.component_name.as_deref(), Some("BuyButton"));
        }
    }

    #[tokio::test]
    async fn component_handlers_carry_base_metadata() {
        let (tracker, sink) = test_tracker();
        let mut metadata = HashMap::new();
        metadata.insert("experiment".to_string(), serde_json::json!("checkout-v2"));
        let handlers = ComponentHandlers::with_metadata(tracker.clone(), "BuyButton", metadata);

        handlers.on_click();
        tracker.flush_queue().await;

        let event = &sink.batches()[0][0];
        assert_eq!(
            event.user_metadata.get("experiment"),
            Some(&serde_json::json!("checkout-v2"))
        );
    }

    #[tokio::test]
    async fn page_listener_captures_dom_info() {
        let (tracker, sink) = test_tracker();
        let listener = PageListener::new(tracker.clone());

        listener.on_document_click(DomInfo {
            tag: "BUTTON".to_string(),
            id: Some("submit".to_string()),
            class_name: Some("btn".to_string()),
            text: Some("Buy".to_string()),
        });
        tracker.flush_queue().await;

        let event = &sink.batches()[0][0];
        assert_eq!(event.event_type, EventType::Click);
        assert_eq!(event.location_type, LocationType::Page);
        let dom = event.dom_info.as_ref().unwrap();
        assert_eq!(dom.tag, "BUTTON");
        assert_eq!(dom.id.as_deref(), Some("submit"));
    }

    #[tokio::test]
    async fn page_view_uses_current_context() {
        let (tracker, sink) = test_tracker();

        track_page_view(&tracker);
        tracker.flush_queue().await;

        let event = &sink.batches()[0][0];
        assert_eq!(event.event_type, EventType::PageView);
        assert_eq!(event.location_type, LocationType::Page);
        assert_eq!(event.page_path, "/docs");
        assert_eq!(event.page_title, "Docs");
    }
}
