use super::NodeId;
use std::cell::Cell;

/// A DOM event travelling from its target towards the root
#[derive(Debug, Clone)]
pub struct Event {
    event_type: String,
    target: NodeId,
    bubbles: bool,
    propagation_stopped: Cell<bool>,
    immediate_stopped: Cell<bool>,
}

impl Event {
    /// Native event; bubbles
    pub fn new(event_type: impl Into<String>, target: NodeId) -> Self {
        Self {
            event_type: event_type.into(),
            target,
            bubbles: true,
            propagation_stopped: Cell::new(false),
            immediate_stopped: Cell::new(false),
        }
    }

    /// `new CustomEvent(type)`; does not bubble
    pub fn custom(event_type: impl Into<String>, target: NodeId) -> Self {
        Self {
            bubbles: false,
            ..Self::new(event_type, target)
        }
    }

    /// Event type (`click`, `q-resume`, ...)
    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// Node the event was dispatched on
    pub fn target(&self) -> NodeId {
        self.target
    }

    /// Whether the event continues past its target
    pub fn bubbles(&self) -> bool {
        self.bubbles
    }

    /// Stop visiting further ancestors
    pub fn stop_propagation(&self) {
        self.propagation_stopped.set(true);
    }

    /// Stop visiting further ancestors and remaining handlers on this node
    pub fn stop_immediate_propagation(&self) {
        self.propagation_stopped.set(true);
        self.immediate_stopped.set(true);
    }

    /// `stop_propagation` was called
    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped.get()
    }

    /// `stop_immediate_propagation` was called
    pub fn is_immediate_propagation_stopped(&self) -> bool {
        self.immediate_stopped.get()
    }
}
