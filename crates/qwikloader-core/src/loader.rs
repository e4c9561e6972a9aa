//! Loader facade
//!
//! Ties the dispatcher, resume activator and prefetch bridge to one document:
//!
//! ```ignore
//! let state = Rc::new(LoaderState::new());
//! let loader = Loader::new(LoaderOptions::default(), registry, state)
//!     .on_error(|err| eprintln!("{err}"));
//!
//! loader.initialize(&doc);
//! doc.dispatch_event(Event::new("click", button));
//! loader.drain(&doc).await;
//! ```

use crate::config::LoaderOptions;
use crate::dispatch::{DispatchReport, EventDispatcher};
use crate::dom::{Dom, Event, NodeId, READY_STATE_CHANGE};
use crate::error::{LoaderError, LoaderResult};
use crate::module::{get_module_export, Handler, ModuleHost, ModuleObject};
use crate::prefetch::{PrefetchBridge, WorkerFactory};
use crate::resolve::resolve_reference;
use crate::resume::ResumeActivator;
use crate::state::LoaderState;
use crate::symbol::SymbolRef;
use std::rc::Rc;
use url::Url;

type ErrorSink = Box<dyn Fn(&LoaderError)>;

/// Document loader
pub struct Loader<H> {
    options: LoaderOptions,
    host: H,
    state: Rc<LoaderState>,
    prefetch: PrefetchBridge,
    on_error: Option<ErrorSink>,
}

impl<H: ModuleHost> Loader<H> {
    /// Create a loader over `host` sharing the document's `state`
    pub fn new(options: LoaderOptions, host: H, state: Rc<LoaderState>) -> Self {
        Self {
            options,
            host,
            state,
            prefetch: PrefetchBridge::unsupported(),
            on_error: None,
        }
    }

    /// Enable prefetching through workers created by `factory`
    pub fn with_worker_factory(mut self, factory: impl WorkerFactory + 'static) -> Self {
        self.prefetch = PrefetchBridge::new(factory);
        self
    }

    /// Receive errors that no caller handles (missing exports, failed imports,
    /// failing handlers)
    pub fn on_error(mut self, sink: impl Fn(&LoaderError) + 'static) -> Self {
        self.on_error = Some(Box::new(sink));
        self
    }

    /// Options in use
    pub fn options(&self) -> &LoaderOptions {
        &self.options
    }

    /// Module host
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Document state handle
    pub fn state(&self) -> &Rc<LoaderState> {
        &self.state
    }

    fn dispatcher(&self) -> EventDispatcher<'_, H> {
        EventDispatcher::new(&self.options, &self.state, &self.host)
    }

    fn activator(&self) -> ResumeActivator<'_> {
        ResumeActivator::new(&self.options, &self.state)
    }

    /// Start the loader on `dom`
    ///
    /// Arms the resume event, the configured event types and (when enabled)
    /// every type found in handler attributes, then fires resume or waits for
    /// readiness. Returns `false` without doing anything if a loader already
    /// initialized this document.
    pub fn initialize<D: Dom>(&self, dom: &D) -> bool {
        if !self.state.mark_initialized() {
            tracing::debug!("loader already initialized for this document");
            return false;
        }

        let dispatcher = self.dispatcher();
        dispatcher.arm(dom, &self.options.resume_event);
        for event_type in &self.options.events {
            dispatcher.arm(dom, event_type);
        }
        if self.options.discover_events {
            dispatcher.discover(dom);
        }

        if !dom.ready_state().is_ready() {
            dom.add_root_listener(READY_STATE_CHANGE);
        }
        self.activator().activate(dom);

        tracing::debug!(
            ready_state = %dom.ready_state(),
            events = ?self.state.armed_events(),
            "loader initialized"
        );
        true
    }

    /// Declare event types after initialization
    ///
    /// Returns the number of newly armed types.
    pub fn register_events<D: Dom>(&self, dom: &D, event_types: &[&str]) -> usize {
        let dispatcher = self.dispatcher();
        event_types
            .iter()
            .filter(|event_type| dispatcher.arm(dom, event_type))
            .count()
    }

    /// Re-scan the document for handler attributes
    pub fn discover_events<D: Dom>(&self, dom: &D) -> usize {
        self.dispatcher().discover(dom)
    }

    /// Handle one event that reached the document root
    pub async fn handle_event<D: Dom>(&self, dom: &D, event: &Event) -> DispatchReport {
        if event.event_type() == READY_STATE_CHANGE {
            self.activator().on_ready_state_change(dom);
        }

        let report = self.dispatcher().dispatch(dom, event).await;
        for err in &report.errors {
            self.report_error(err);
        }
        report
    }

    /// Handle queued events until the platform queue is empty
    ///
    /// Resume events queued while a `readystatechange` is handled are
    /// handled by the same drain.
    pub async fn drain<D: Dom>(&self, dom: &D) -> Vec<DispatchReport> {
        let mut reports = Vec::new();
        while let Some(event) = dom.next_pending_event() {
            reports.push(self.handle_event(dom, &event).await);
        }
        reports
    }

    /// Resolve `raw` against the base in effect for `node`
    pub fn resolve<D: Dom>(&self, dom: &D, node: NodeId, raw: &str) -> LoaderResult<SymbolRef> {
        resolve_reference(dom, node, raw, &self.options.attributes)
    }

    /// Export designated by `symbol` in `module`
    pub fn get_module_export<'m>(
        &self,
        symbol: &SymbolRef,
        module: &'m ModuleObject,
    ) -> LoaderResult<&'m Handler> {
        get_module_export(symbol, module)
    }

    /// Prefetch the modules listed on `node`; returns what was posted
    pub fn prefetch<D: Dom>(&self, dom: &D, node: NodeId) -> Vec<Url> {
        self.prefetch.prefetch(dom, node, &self.options.attributes)
    }

    fn report_error(&self, err: &LoaderError) {
        tracing::error!(error = %err, "unhandled loader error");
        if let Some(sink) = &self.on_error {
            sink(err);
        }
    }
}

impl<H: std::fmt::Debug> std::fmt::Debug for Loader<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Loader")
            .field("options", &self.options)
            .field("host", &self.host)
            .field("state", &self.state)
            .field("prefetch", &self.prefetch)
            .finish_non_exhaustive()
    }
}
