//! Arena-backed document
//!
//! All nodes live in one `Vec`; parents and children are `NodeId` indices.
//! Detached elements (created but never appended) keep their own parent chain
//! but are not returned by [`Dom::elements`].

use super::{Dom, Event, NodeId, ReadyState};
use rustc_hash::FxHashSet;
use std::cell::RefCell;
use std::collections::VecDeque;
use url::Url;

/// Event type queued when the ready state changes
pub const READY_STATE_CHANGE: &str = "readystatechange";

#[derive(Debug, Clone)]
struct NodeData {
    tag: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    attributes: Vec<(String, String)>,
}

impl NodeData {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            parent: None,
            children: Vec::new(),
            attributes: Vec::new(),
        }
    }
}

/// In-memory document
#[derive(Debug)]
pub struct Document {
    base_uri: Url,
    ready_state: ReadyState,
    nodes: Vec<NodeData>,
    root: NodeId,
    body: NodeId,
    root_listeners: RefCell<FxHashSet<String>>,
    pending: RefCell<VecDeque<Event>>,
}

impl Document {
    /// Create an `<html><body></body></html>` document in `complete` state
    pub fn new(base_uri: Url) -> Self {
        let mut doc = Self {
            base_uri,
            ready_state: ReadyState::Complete,
            nodes: Vec::new(),
            root: NodeId(0),
            body: NodeId(0),
            root_listeners: RefCell::new(FxHashSet::default()),
            pending: RefCell::new(VecDeque::new()),
        };
        doc.root = doc.create_element("html");
        doc.body = doc.create_element("body");
        doc.append_child(doc.root, doc.body);
        doc
    }

    /// Document element
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// `<body>`
    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeData::new(tag));
        id
    }

    /// Lowercased tag name
    pub fn tag_name(&self, node: NodeId) -> &str {
        &self.nodes[node.index()].tag
    }

    /// Children in order
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.index()].children
    }

    /// Move `child` to the end of `parent`'s children
    ///
    /// # Panics
    /// Panics if `child` is `parent` or one of its ancestors.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        assert!(
            !self.ancestors(parent).any(|n| n == child),
            "append_child would create a cycle"
        );

        if let Some(old) = self.nodes[child.index()].parent.take() {
            self.nodes[old.index()].children.retain(|&c| c != child);
        }
        self.nodes[child.index()].parent = Some(parent);
        self.nodes[parent.index()].children.push(child);
    }

    /// Detach `node` from its parent
    pub fn remove(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.index()].parent.take() {
            self.nodes[parent.index()].children.retain(|&c| c != node);
        }
    }

    /// Set or replace an attribute, keeping its original position
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        let attributes = &mut self.nodes[node.index()].attributes;
        match attributes.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = value.to_string(),
            None => attributes.push((name.to_string(), value.to_string())),
        }
    }

    /// Remove an attribute
    pub fn remove_attribute(&mut self, node: NodeId, name: &str) {
        self.nodes[node.index()].attributes.retain(|(n, _)| n != name);
    }

    /// Change the ready state, queueing `readystatechange` for root listeners
    pub fn set_ready_state(&mut self, state: ReadyState) {
        if self.ready_state == state {
            return;
        }
        self.ready_state = state;
        if self.has_root_listener(READY_STATE_CHANGE) {
            self.pending
                .borrow_mut()
                .push_back(Event::custom(READY_STATE_CHANGE, self.root));
        }
    }

    /// Whether a root listener exists for `event_type`
    pub fn has_root_listener(&self, event_type: &str) -> bool {
        self.root_listeners.borrow().contains(event_type)
    }

    /// Event types with a root listener, sorted
    pub fn root_listeners(&self) -> Vec<String> {
        let mut listeners: Vec<String> = self.root_listeners.borrow().iter().cloned().collect();
        listeners.sort();
        listeners
    }

    /// Whether `node` is reachable from the document element
    pub fn is_connected(&self, node: NodeId) -> bool {
        self.ancestors(node).last() == Some(self.root)
    }

    fn collect_preorder(&self, node: NodeId, out: &mut Vec<NodeId>) {
        out.push(node);
        for &child in &self.nodes[node.index()].children {
            self.collect_preorder(child, out);
        }
    }
}

impl Dom for Document {
    fn base_uri(&self) -> &Url {
        &self.base_uri
    }

    fn ready_state(&self) -> ReadyState {
        self.ready_state
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.index()].parent
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.nodes[node.index()]
            .attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    fn attribute_names(&self, node: NodeId) -> Vec<&str> {
        self.nodes[node.index()]
            .attributes
            .iter()
            .map(|(n, _)| n.as_str())
            .collect()
    }

    fn elements(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        self.collect_preorder(self.root, &mut out);
        out
    }

    fn add_root_listener(&self, event_type: &str) {
        self.root_listeners.borrow_mut().insert(event_type.to_string());
    }

    fn dispatch_event(&self, event: Event) {
        self.pending.borrow_mut().push_back(event);
    }

    fn next_pending_event(&self) -> Option<Event> {
        self.pending.borrow_mut().pop_front()
    }
}
