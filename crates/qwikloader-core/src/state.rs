//! Per-document loader state
//!
//! One [`LoaderState`] exists per document lifetime. It is created before the
//! loader starts, shared (`Rc`) with every loader attached to the same
//! document, and dropped with the document. Flags only ever go from unset to
//! set.

use rustc_hash::FxHashSet;
use std::cell::{Cell, RefCell};

/// Document-scoped loader state
#[derive(Debug, Default)]
pub struct LoaderState {
    initialized: Cell<bool>,
    resume_pending: Cell<bool>,
    resumed: Cell<bool>,
    armed: RefCell<FxHashSet<String>>,
}

impl LoaderState {
    /// Fresh state for a new document
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the initialization flag; `true` only for the first caller
    pub fn mark_initialized(&self) -> bool {
        !self.initialized.replace(true)
    }

    /// Whether a loader already initialized this document
    pub fn is_initialized(&self) -> bool {
        self.initialized.get()
    }

    /// Record `event_type` as armed; `true` if it was idle
    pub fn arm(&self, event_type: &str) -> bool {
        let mut armed = self.armed.borrow_mut();
        if armed.contains(event_type) {
            return false;
        }
        armed.insert(event_type.to_string())
    }

    /// Whether a root listener exists for `event_type`
    pub fn is_armed(&self, event_type: &str) -> bool {
        self.armed.borrow().contains(event_type)
    }

    /// Armed event types, sorted
    pub fn armed_events(&self) -> Vec<String> {
        let mut events: Vec<String> = self.armed.borrow().iter().cloned().collect();
        events.sort();
        events
    }

    /// Resume waits for the document to become ready
    pub fn defer_resume(&self) {
        if !self.resumed.get() {
            self.resume_pending.set(true);
        }
    }

    /// Whether resume is waiting for readiness
    pub fn is_resume_pending(&self) -> bool {
        self.resume_pending.get()
    }

    /// Claim the one-time resume; `true` only for the first caller
    pub fn claim_resume(&self) -> bool {
        self.resume_pending.set(false);
        !self.resumed.replace(true)
    }

    /// Whether resume events were already fired
    pub fn is_resumed(&self) -> bool {
        self.resumed.get()
    }
}
