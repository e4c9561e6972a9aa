//! Delegated event dispatch
//!
//! Each event type has at most one listener, attached at the document root
//! the first time the type is armed. When an event reaches the root, the
//! dispatcher walks from the target towards the root. Every visited element
//! with an `on:<type>` attribute gets each whitespace separated reference in
//! that attribute resolved, imported and invoked, in declaration order.
//!
//! Halting: only the event's own propagation flags stop the walk.
//! `stop_propagation` lets the remaining handlers of the current element run
//! and then ends the walk; `stop_immediate_propagation` ends it at once.
//! Handler results never halt it, and a failed reference does not prevent the
//! next one from running. Events that do not bubble visit their target only.

use crate::config::LoaderOptions;
use crate::dom::{Dom, Event, NodeId};
use crate::error::{LoaderError, LoaderResult};
use crate::module::{get_module_export, HandlerContext, ModuleHost};
use crate::resolve::resolve_reference;
use crate::state::LoaderState;
use crate::symbol::SymbolRef;

/// What happened while dispatching one event
#[derive(Debug, Default)]
pub struct DispatchReport {
    /// References whose handler ran and returned `Ok`, in invocation order
    pub invoked: Vec<SymbolRef>,
    /// Failures, in the order they occurred
    pub errors: Vec<LoaderError>,
    /// Propagation was stopped by a handler
    pub stopped: bool,
}

impl DispatchReport {
    /// No failures
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of handlers that ran successfully
    pub fn invoked_count(&self) -> usize {
        self.invoked.len()
    }
}

/// Root-level event delegation
#[derive(Debug)]
pub struct EventDispatcher<'a, H> {
    options: &'a LoaderOptions,
    state: &'a LoaderState,
    host: &'a H,
}

impl<'a, H: ModuleHost> EventDispatcher<'a, H> {
    /// Borrow the loader's options, state and module host
    pub fn new(options: &'a LoaderOptions, state: &'a LoaderState, host: &'a H) -> Self {
        Self {
            options,
            state,
            host,
        }
    }

    /// Attach the root listener for `event_type` unless it is already armed
    pub fn arm<D: Dom>(&self, dom: &D, event_type: &str) -> bool {
        if !self.state.arm(event_type) {
            return false;
        }
        dom.add_root_listener(event_type);
        tracing::debug!(event_type, "armed root listener");
        true
    }

    /// Arm every event type named by a handler attribute in the document
    ///
    /// Returns the number of newly armed types.
    pub fn discover<D: Dom>(&self, dom: &D) -> usize {
        let mut armed = 0;
        for node in dom.elements() {
            for name in dom.attribute_names(node) {
                if let Some(event_type) = self.options.event_type_of(name) {
                    if self.arm(dom, event_type) {
                        armed += 1;
                    }
                }
            }
        }
        armed
    }

    /// Deliver `event` to the delegated handlers on its path
    pub async fn dispatch<D: Dom>(&self, dom: &D, event: &Event) -> DispatchReport {
        let mut report = DispatchReport::default();
        if !self.state.is_armed(event.event_type()) {
            tracing::trace!(event_type = event.event_type(), "no root listener");
            return report;
        }

        let attribute = self.options.handler_attribute(event.event_type());
        for node in dom.ancestors(event.target()) {
            if let Some(value) = dom.attribute(node, &attribute) {
                tracing::trace!(%node, %attribute, "delegated handlers found");
                for raw in value.split_whitespace() {
                    match self.invoke(dom, node, event, raw).await {
                        Ok(symbol) => report.invoked.push(symbol),
                        Err(err) => report.errors.push(err),
                    }
                    if event.is_immediate_propagation_stopped() {
                        break;
                    }
                }
            }

            if event.is_propagation_stopped() {
                report.stopped = true;
                break;
            }
            if !event.bubbles() {
                break;
            }
        }

        report
    }

    async fn invoke<D: Dom>(
        &self,
        dom: &D,
        node: NodeId,
        event: &Event,
        raw: &str,
    ) -> LoaderResult<SymbolRef> {
        let symbol = resolve_reference(dom, node, raw, &self.options.attributes)?;
        let module_url = symbol.module_url();

        tracing::debug!(%symbol, "importing handler module");
        let module = self
            .host
            .import(&module_url)
            .await
            .map_err(|source| LoaderError::ModuleLoad {
                url: module_url.to_string(),
                source,
            })?;

        let handler = get_module_export(&symbol, &module)?;
        let ctx = HandlerContext {
            element: node,
            event,
            symbol: &symbol,
        };
        handler
            .call(&ctx)
            .map_err(|source| LoaderError::Handler {
                reference: symbol.to_string(),
                source,
            })?;

        Ok(symbol)
    }
}
