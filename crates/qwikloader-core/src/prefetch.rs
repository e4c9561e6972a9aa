//! Prefetch bridge
//!
//! Reads an element's `q:prefetch` list, resolves each line against the
//! element's base and posts the ordered absolute URLs to a background worker
//! as one message. The worker is created on first use and reused afterwards.
//! Without worker support the bridge does nothing.

use crate::config::AttributeNames;
use crate::dom::{Dom, NodeId};
use crate::resolve::resolve_reference;
use once_cell::unsync::OnceCell;
use url::Url;

/// Receiving end of prefetch messages
pub trait PrefetchWorker {
    /// Post one ordered list of absolute URLs; no reply
    fn post_message(&self, urls: Vec<String>);
}

/// Creates the prefetch worker
pub trait WorkerFactory {
    /// `None` when the environment cannot run workers
    fn spawn(&self) -> Option<Box<dyn PrefetchWorker>>;
}

impl<F> WorkerFactory for F
where
    F: Fn() -> Option<Box<dyn PrefetchWorker>>,
{
    fn spawn(&self) -> Option<Box<dyn PrefetchWorker>> {
        self()
    }
}

/// Lazily created, shared prefetch worker
#[derive(Default)]
pub struct PrefetchBridge {
    factory: Option<Box<dyn WorkerFactory>>,
    worker: OnceCell<Option<Box<dyn PrefetchWorker>>>,
}

impl PrefetchBridge {
    /// Bridge that creates its worker with `factory`
    pub fn new(factory: impl WorkerFactory + 'static) -> Self {
        Self {
            factory: Some(Box::new(factory)),
            worker: OnceCell::new(),
        }
    }

    /// Bridge without worker support
    pub fn unsupported() -> Self {
        Self::default()
    }

    /// Whether a worker exists or can be created
    pub fn is_supported(&self) -> bool {
        self.worker().is_some()
    }

    /// Prefetch the modules listed on `node`
    ///
    /// Returns the URLs posted to the worker, in list order. Blank lines and
    /// lines that fail to resolve are skipped. Nothing is posted when the list
    /// is empty or no worker is available.
    pub fn prefetch<D: Dom>(&self, dom: &D, node: NodeId, attrs: &AttributeNames) -> Vec<Url> {
        let Some(list) = dom.attribute(node, &attrs.prefetch) else {
            return Vec::new();
        };

        let urls: Vec<Url> = list
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .filter_map(|raw| match resolve_reference(dom, node, raw, attrs) {
                Ok(symbol) => Some(symbol.as_url().clone()),
                Err(err) => {
                    tracing::warn!(%node, reference = raw, error = %err, "skipping prefetch entry");
                    None
                }
            })
            .collect();

        if urls.is_empty() {
            return urls;
        }

        let Some(worker) = self.worker() else {
            tracing::debug!(%node, "no prefetch worker available");
            return Vec::new();
        };

        worker.post_message(urls.iter().map(Url::to_string).collect());
        tracing::debug!(%node, count = urls.len(), "prefetch posted");
        urls
    }

    fn worker(&self) -> Option<&dyn PrefetchWorker> {
        self.worker
            .get_or_init(|| self.factory.as_ref().and_then(|f| f.spawn()))
            .as_deref()
    }
}

impl std::fmt::Debug for PrefetchBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrefetchBridge")
            .field("has_factory", &self.factory.is_some())
            .field("worker_started", &self.worker.get().is_some_and(Option::is_some))
            .finish()
    }
}
