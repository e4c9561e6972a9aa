//! Document model seen by the loader
//!
//! The loader never owns the tree. It reads attributes and walks parents
//! through [`Dom`], and hands synthetic events back to the platform through
//! [`Dom::dispatch_event`].

mod document;
mod event;

pub use document::{Document, READY_STATE_CHANGE};
pub use event::Event;

use std::fmt;
use url::Url;

/// Node identifier (index into the document arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Get the raw index
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// `document.readyState`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
    /// Still parsing
    Loading,
    /// Parsed, subresources pending
    Interactive,
    /// Fully loaded
    Complete,
}

impl ReadyState {
    /// Interactive or complete
    pub fn is_ready(self) -> bool {
        matches!(self, ReadyState::Interactive | ReadyState::Complete)
    }

    /// DOM spelling of the state
    pub fn as_str(self) -> &'static str {
        match self {
            ReadyState::Loading => "loading",
            ReadyState::Interactive => "interactive",
            ReadyState::Complete => "complete",
        }
    }
}

impl fmt::Display for ReadyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Platform document the loader runs against
pub trait Dom {
    /// Document base URL
    fn base_uri(&self) -> &Url;

    /// Current ready state
    fn ready_state(&self) -> ReadyState;

    /// Parent element, `None` at the root or for a detached subtree root
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Attribute value
    fn attribute(&self, node: NodeId, name: &str) -> Option<&str>;

    /// Attribute names in declaration order
    fn attribute_names(&self, node: NodeId) -> Vec<&str>;

    /// Connected elements in document order
    fn elements(&self) -> Vec<NodeId>;

    /// Connected elements carrying `name`, in document order
    fn query_all_with_attribute(&self, name: &str) -> Vec<NodeId> {
        self.elements()
            .into_iter()
            .filter(|&node| self.attribute(node, name).is_some())
            .collect()
    }

    /// Attach a listener for `event_type` at the document root
    fn add_root_listener(&self, event_type: &str);

    /// Dispatch an event on its target
    fn dispatch_event(&self, event: Event);

    /// Next event waiting to reach the root listeners
    fn next_pending_event(&self) -> Option<Event>;

    /// Walk `node` and its ancestors up to the root
    fn ancestors(&self, node: NodeId) -> Ancestors<'_, Self>
    where
        Self: Sized,
    {
        Ancestors {
            dom: self,
            next: Some(node),
        }
    }
}

/// Iterator over a node and its ancestors, innermost first
#[derive(Debug)]
pub struct Ancestors<'a, D> {
    dom: &'a D,
    next: Option<NodeId>,
}

impl<D: Dom> Iterator for Ancestors<'_, D> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.dom.parent(current);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ready_state() {
        assert!(!ReadyState::Loading.is_ready());
        assert!(ReadyState::Interactive.is_ready());
        assert!(ReadyState::Complete.is_ready());
        assert_eq!(ReadyState::Interactive.to_string(), "interactive");
    }

    #[test]
    fn test_ancestors_inclusive() {
        let mut doc = Document::new(Url::parse("http://document.qwik.dev/").unwrap());
        let outer = doc.create_element("section");
        let inner = doc.create_element("button");
        doc.append_child(doc.body(), outer);
        doc.append_child(outer, inner);

        let chain: Vec<NodeId> = doc.ancestors(inner).collect();
        assert_eq!(chain, vec![inner, outer, doc.body(), doc.root()]);

        // Restartable
        assert_eq!(doc.ancestors(inner).count(), 4);
    }

    #[test]
    fn test_ancestors_detached() {
        let mut doc = Document::new(Url::parse("http://document.qwik.dev/").unwrap());
        let parent = doc.create_element("parent");
        let child = doc.create_element("div");
        doc.append_child(parent, child);

        let chain: Vec<NodeId> = doc.ancestors(child).collect();
        assert_eq!(chain, vec![child, parent]);
    }
}
