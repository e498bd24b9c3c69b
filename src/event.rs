//! Event model for captured user interactions.
//!
//! A [`UserEvent`] is the fully-enriched record that travels in delivery
//! batches. Callers hand the engine an [`EventDraft`]; the ambient fields
//! (timestamp, event id, page context) are not representable on a draft
//! and are always assigned by the engine at capture time.

use std::collections::HashMap;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Current Unix time in milliseconds.
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Interaction type.
///
/// Open enumeration: the well-known interactions are first-class variants;
/// any other string round-trips unchanged through [`EventType::Custom`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventType {
    Click,
    HoverEnter,
    HoverLeave,
    PageView,
    Unknown,
    Custom(String),
}

impl EventType {
    /// Wire representation (`CLICK`, `HOVER_ENTER`, ...).
    pub fn as_str(&self) -> &str {
        match self {
            EventType::Click => "CLICK",
            EventType::HoverEnter => "HOVER_ENTER",
            EventType::HoverLeave => "HOVER_LEAVE",
            EventType::PageView => "PAGE_VIEW",
            EventType::Unknown => "UNKNOWN",
            EventType::Custom(name) => name,
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for EventType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "CLICK" => EventType::Click,
            "HOVER_ENTER" => EventType::HoverEnter,
            "HOVER_LEAVE" => EventType::HoverLeave,
            "PAGE_VIEW" => EventType::PageView,
            "UNKNOWN" => EventType::Unknown,
            _ => EventType::Custom(value),
        }
    }
}

impl From<&str> for EventType {
    fn from(value: &str) -> Self {
        EventType::from(value.to_string())
    }
}

impl From<EventType> for String {
    fn from(value: EventType) -> Self {
        match value {
            EventType::Custom(name) => name,
            other => other.as_str().to_string(),
        }
    }
}

/// Where the interaction was captured: on a named component or at page level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LocationType {
    Component,
    Page,
}

/// DOM metadata extracted from the interaction target of a page-level event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomInfo {
    /// Element tag name (e.g. `BUTTON`).
    pub tag: String,

    /// Element id attribute, if set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Element class attribute, if set. Wire key `className`.
    #[serde(
        default,
        rename = "className",
        skip_serializing_if = "Option::is_none"
    )]
    pub class_name: Option<String>,

    /// Visible text content, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// One captured interaction, enriched and ready for delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserEvent {
    /// Capture time, milliseconds since the Unix epoch.
    pub timestamp: u64,

    /// UUID v4 assigned at capture time.
    pub event_id: String,

    /// What happened.
    pub event_type: EventType,

    /// Where it happened.
    pub location_type: LocationType,

    /// Component name for component-scoped events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_name: Option<String>,

    /// Page path at capture time, engine-assigned.
    pub page_path: String,

    /// Page title at capture time, engine-assigned.
    pub page_title: String,

    /// DOM metadata for page-level DOM-derived events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dom_info: Option<DomInfo>,

    /// Caller-supplied metadata.
    #[serde(default)]
    pub user_metadata: HashMap<String, serde_json::Value>,
}

/// Caller-facing partial event.
///
/// Drafts carry only the fields a caller may legitimately set. The ambient
/// fields of [`UserEvent`] have no counterpart here, so enrichment cannot
/// be overridden.
#[derive(Debug, Clone, Default)]
pub struct EventDraft {
    /// Interaction type; `UNKNOWN` when omitted.
    pub event_type: Option<EventType>,

    /// Capture location; `PAGE` when omitted.
    pub location_type: Option<LocationType>,

    /// Component name for component-scoped captures.
    pub component_name: Option<String>,

    /// DOM metadata for page-level captures.
    pub dom_info: Option<DomInfo>,

    /// Caller-supplied metadata; empty when omitted.
    pub user_metadata: HashMap<String, serde_json::Value>,
}

impl EventDraft {
    /// Draft for a component-scoped interaction.
    pub fn component(event_type: EventType, component_name: impl Into<String>) -> Self {
        EventDraft {
            event_type: Some(event_type),
            location_type: Some(LocationType::Component),
            component_name: Some(component_name.into()),
            ..EventDraft::default()
        }
    }

    /// Draft for a page-level interaction.
    pub fn page(event_type: EventType) -> Self {
        EventDraft {
            event_type: Some(event_type),
            location_type: Some(LocationType::Page),
            ..EventDraft::default()
        }
    }
}
