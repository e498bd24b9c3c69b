//! Environment context for event enrichment.
//!
//! The engine never reaches into ambient global state for the current
//! page; it asks a [`ContextProvider`]. Host applications install a
//! provider they update on navigation; tests substitute a fixed one.

use parking_lot::RwLock;

/// Snapshot of the page context at capture time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageContext {
    /// Current page path (e.g. `/shop`).
    pub path: String,

    /// Current page title.
    pub title: String,
}

impl PageContext {
    pub fn new(path: impl Into<String>, title: impl Into<String>) -> Self {
        PageContext {
            path: path.into(),
            title: title.into(),
        }
    }
}

/// Capability providing the current page context.
///
/// Called once per enrichment; implementations should be cheap.
pub trait ContextProvider: Send + Sync {
    fn current(&self) -> PageContext;
}

/// Host-updated context provider.
///
/// The embedding application calls [`AppContext::navigate`] whenever its
/// location changes; every capture between two navigations is stamped with
/// the same path and title.
#[derive(Debug, Default)]
pub struct AppContext {
    current: RwLock<PageContext>,
}

impl AppContext {
    pub fn new(path: impl Into<String>, title: impl Into<String>) -> Self {
        AppContext {
            current: RwLock::new(PageContext::new(path, title)),
        }
    }

    /// Record a location change.
    pub fn navigate(&self, path: impl Into<String>, title: impl Into<String>) {
        *self.current.write() = PageContext::new(path, title);
    }
}

impl ContextProvider for AppContext {
    fn current(&self) -> PageContext {
        self.current.read().clone()
    }
}
