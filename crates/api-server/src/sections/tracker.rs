//! Active-section tracking for navigation highlight.
//!
//! A pure state machine over viewport-intersection observations: the
//! topmost intersecting section element decides the active navigation
//! path. The watcher is a scoped resource: acquired on attach,
//! released unconditionally on detach, independent of anything else.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Section element ids and the canonical navigation path each maps to.
static SECTION_PATHS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("hero", "/"),
        ("services", "/services"),
        ("why-us", "/why-us"),
        ("blog", "/blog"),
        ("shop", "/shop"),
        ("case-studies", "/portfolio"),
    ])
});

/// One observation for one element, as reported by the viewport
/// watcher on an intersection change.
#[derive(Debug, Clone)]
pub struct IntersectionEntry {
    pub element_id: String,
    /// Vertical offset of the element's top edge within the viewport.
    pub top: f64,
    pub is_intersecting: bool,
}

#[derive(Debug)]
pub struct ActiveSectionTracker {
    active_path: String,
    observing: bool,
}

impl Default for ActiveSectionTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ActiveSectionTracker {
    pub fn new() -> Self {
        Self {
            active_path: "/".to_string(),
            observing: false,
        }
    }

    /// Attach the watcher to the section elements present in the
    /// document. With no known section elements the tracker stays
    /// inert: no observer, no error. Returns whether observation
    /// started.
    pub fn attach<'a, I>(&mut self, element_ids: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.observing = element_ids
            .into_iter()
            .any(|id| SECTION_PATHS.contains_key(id));
        self.observing
    }

    /// Release the watcher. Safe to call in any state.
    pub fn detach(&mut self) {
        self.observing = false;
    }

    /// Feed one batch of intersection observations. The topmost
    /// intersecting element wins; an element with no known path keeps
    /// the previous active path.
    pub fn observe(&mut self, mut entries: Vec<IntersectionEntry>) {
        if !self.observing {
            return;
        }

        entries.retain(|e| e.is_intersecting);
        // Stable: equal offsets keep observation order.
        entries.sort_by(|a, b| a.top.total_cmp(&b.top));

        if let Some(topmost) = entries.first() {
            if let Some(path) = SECTION_PATHS.get(topmost.element_id.as_str()) {
                self.active_path = (*path).to_string();
            }
        }
    }

    pub fn active_path(&self) -> &str {
        &self.active_path
    }

    pub fn is_observing(&self) -> bool {
        self.observing
    }
}
