//! In-memory module host
//!
//! Models the platform module map: modules are defined up front by URL with a
//! factory standing in for top-level evaluation. The factory runs once per URL
//! on success; later imports share the cached instance. A failed evaluation is
//! not cached, so the next import evaluates again.

use super::{ModuleHost, ModuleObject};
use crate::error::ImportError;
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::future::{ready, Future};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use url::Url;

type Factory = dyn Fn(&Url) -> Result<ModuleObject, ImportError> + Send + Sync;

struct Entry {
    factory: Box<Factory>,
    instance: OnceCell<Arc<ModuleObject>>,
    evaluations: AtomicUsize,
}

/// Module map keyed by module URL (fragment removed)
#[derive(Default)]
pub struct ModuleRegistry {
    entries: RwLock<FxHashMap<String, Arc<Entry>>>,
    requests: AtomicUsize,
}

impl ModuleRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve the module produced by `factory` at `url`
    ///
    /// Replaces any earlier definition, including its cached instance.
    pub fn define<F>(&self, url: &Url, factory: F)
    where
        F: Fn(&Url) -> Result<ModuleObject, ImportError> + Send + Sync + 'static,
    {
        let entry = Arc::new(Entry {
            factory: Box::new(factory),
            instance: OnceCell::new(),
            evaluations: AtomicUsize::new(0),
        });
        self.entries.write().insert(Self::key(url), entry);
    }

    /// Serve an already built module at its own URL
    pub fn define_module(&self, module: ModuleObject) {
        let url = module.url().clone();
        self.define(&url, move |_| Ok(module.clone()));
    }

    /// Import synchronously
    pub fn load(&self, url: &Url) -> Result<Arc<ModuleObject>, ImportError> {
        self.requests.fetch_add(1, Ordering::Relaxed);
        let key = Self::key(url);
        let entry = self
            .entries
            .read()
            .get(&key)
            .cloned()
            .ok_or_else(|| ImportError::NotFound(key.clone()))?;

        entry
            .instance
            .get_or_try_init(|| {
                entry.evaluations.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(url = %key, "evaluating module");
                (entry.factory)(url).map(Arc::new)
            })
            .cloned()
    }

    /// Number of `import` calls served, successful or not
    pub fn import_requests(&self) -> usize {
        self.requests.load(Ordering::Relaxed)
    }

    /// Number of times the module at `url` was evaluated
    pub fn evaluations(&self, url: &Url) -> usize {
        self.entries
            .read()
            .get(&Self::key(url))
            .map_or(0, |entry| entry.evaluations.load(Ordering::Relaxed))
    }

    /// Whether the module at `url` has a cached instance
    pub fn is_evaluated(&self, url: &Url) -> bool {
        self.entries
            .read()
            .get(&Self::key(url))
            .is_some_and(|entry| entry.instance.get().is_some())
    }

    fn key(url: &Url) -> String {
        let mut url = url.clone();
        url.set_fragment(None);
        url.into()
    }
}

impl ModuleHost for ModuleRegistry {
    fn import(&self, url: &Url) -> impl Future<Output = Result<Arc<ModuleObject>, ImportError>> {
        ready(self.load(url))
    }
}

impl std::fmt::Debug for ModuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut urls: Vec<String> = self.entries.read().keys().cloned().collect();
        urls.sort();
        f.debug_struct("ModuleRegistry")
            .field("modules", &urls)
            .field("requests", &self.import_requests())
            .finish()
    }
}
