//! Resume activation
//!
//! Once the document is interactive or complete, every element carrying the
//! resume marker (`on:q-resume`) receives one synthetic, non-bubbling
//! `q-resume` event. The activator only dispatches; the delegated handler on
//! the marker attribute does the work when the event reaches the dispatcher.

use crate::config::LoaderOptions;
use crate::dom::{Dom, Event};
use crate::state::LoaderState;

/// Result of an activation attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeOutcome {
    /// Document still loading; activation waits for readiness
    Deferred,
    /// Events dispatched to this many elements
    Fired(usize),
    /// Activation already happened in this document
    AlreadyResumed,
    /// Nothing was waiting for readiness
    Idle,
}

/// Fires the resume signal once per document
#[derive(Debug)]
pub struct ResumeActivator<'a> {
    options: &'a LoaderOptions,
    state: &'a LoaderState,
}

impl<'a> ResumeActivator<'a> {
    /// Borrow the loader's options and state
    pub fn new(options: &'a LoaderOptions, state: &'a LoaderState) -> Self {
        Self { options, state }
    }

    /// Fire now if the document is ready, otherwise wait for readiness
    pub fn activate<D: Dom>(&self, dom: &D) -> ResumeOutcome {
        if self.state.is_resumed() {
            return ResumeOutcome::AlreadyResumed;
        }
        if !dom.ready_state().is_ready() {
            self.state.defer_resume();
            tracing::debug!(ready_state = %dom.ready_state(), "resume deferred");
            return ResumeOutcome::Deferred;
        }
        if !self.state.claim_resume() {
            return ResumeOutcome::AlreadyResumed;
        }

        let marker = self.options.resume_attribute();
        let nodes = dom.query_all_with_attribute(&marker);
        for &node in &nodes {
            dom.dispatch_event(Event::custom(self.options.resume_event.as_str(), node));
        }
        tracing::debug!(count = nodes.len(), "resume events dispatched");
        ResumeOutcome::Fired(nodes.len())
    }

    /// Ready state changed; fire if activation was waiting for it
    pub fn on_ready_state_change<D: Dom>(&self, dom: &D) -> ResumeOutcome {
        if !self.state.is_resume_pending() {
            return if self.state.is_resumed() {
                ResumeOutcome::AlreadyResumed
            } else {
                ResumeOutcome::Idle
            };
        }
        self.activate(dom)
    }
}
