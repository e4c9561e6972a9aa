//! Loaded modules and the module host
//!
//! A module is an export table of handlers keyed by name. The platform's
//! module loader is reached through [`ModuleHost`]; it owns the module cache,
//! so importing the same URL twice must not evaluate the module twice.

mod export;
mod registry;

pub use export::get_module_export;
pub use registry::ModuleRegistry;

use crate::dom::{Event, NodeId};
use crate::error::ImportError;
use crate::symbol::SymbolRef;
use rustc_hash::FxHashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use url::Url;

/// Export used when a reference carries no export name
pub const DEFAULT_EXPORT: &str = "default";

/// Arguments a handler is invoked with
#[derive(Debug)]
pub struct HandlerContext<'a> {
    /// Element whose attribute declared the handler
    pub element: NodeId,
    /// Event being handled
    pub event: &'a Event,
    /// Resolved reference of this handler
    pub symbol: &'a SymbolRef,
}

type HandlerFn = dyn Fn(&HandlerContext<'_>) -> anyhow::Result<()> + Send + Sync;

/// Exported callable
#[derive(Clone)]
pub struct Handler(Arc<HandlerFn>);

impl Handler {
    /// Wrap a closure
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&HandlerContext<'_>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Invoke the handler
    pub fn call(&self, ctx: &HandlerContext<'_>) -> anyhow::Result<()> {
        (self.0)(ctx)
    }

    /// Whether both handles point to the same function
    pub fn ptr_eq(&self, other: &Handler) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handler")
            .field(&Arc::as_ptr(&self.0).cast::<()>())
            .finish()
    }
}

/// Evaluated module
#[derive(Debug, Clone)]
pub struct ModuleObject {
    url: Url,
    exports: FxHashMap<String, Handler>,
}

impl ModuleObject {
    /// Create a module with no exports
    pub fn new(url: Url) -> Self {
        Self {
            url,
            exports: FxHashMap::default(),
        }
    }

    /// Add a named export
    pub fn with_export(mut self, name: impl Into<String>, handler: Handler) -> Self {
        self.exports.insert(name.into(), handler);
        self
    }

    /// Add the default export
    pub fn with_default(self, handler: Handler) -> Self {
        self.with_export(DEFAULT_EXPORT, handler)
    }

    /// Module URL
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Look up an export
    pub fn get(&self, name: &str) -> Option<&Handler> {
        self.exports.get(name)
    }

    /// Exported names, sorted
    pub fn export_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.exports.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Platform module loader (`import(url)`)
pub trait ModuleHost {
    /// Load and evaluate the module at `url`, or return the cached instance
    fn import(&self, url: &Url) -> impl Future<Output = Result<Arc<ModuleObject>, ImportError>>;
}

impl<H: ModuleHost> ModuleHost for Arc<H> {
    fn import(&self, url: &Url) -> impl Future<Output = Result<Arc<ModuleObject>, ImportError>> {
        (**self).import(url)
    }
}
