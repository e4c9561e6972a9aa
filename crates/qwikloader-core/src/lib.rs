//! Qwikloader core
//!
//! This crate provides the document-side runtime of a resumable application:
//! - Symbol references (`<module-url>#<export>`) and their resolution against
//!   the nearest `q:container` boundary's `q:base`
//! - Module export extraction from loaded modules
//! - Event delegation through one root listener per event type
//! - Resume activation once the document becomes interactive
//! - Prefetch of referenced modules through a background worker
//!
//! The platform (DOM tree, module loader, worker) is reached through the
//! [`Dom`], [`ModuleHost`] and [`PrefetchWorker`] traits. [`Document`] and
//! [`ModuleRegistry`] are in-memory implementations of the first two.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod config;
pub mod dispatch;
pub mod dom;
pub mod error;
pub mod loader;
pub mod logging;
pub mod module;
pub mod prefetch;
pub mod resolve;
pub mod resume;
pub mod state;
pub mod symbol;

pub use config::{AttributeNames, ConfigError, LoaderOptions};
pub use dispatch::{DispatchReport, EventDispatcher};
pub use dom::{Ancestors, Document, Dom, Event, NodeId, ReadyState};
pub use error::{ImportError, LoaderError, LoaderResult};
pub use loader::Loader;
pub use module::{
    get_module_export, Handler, HandlerContext, ModuleHost, ModuleObject, ModuleRegistry,
    DEFAULT_EXPORT,
};
pub use prefetch::{PrefetchBridge, PrefetchWorker, WorkerFactory};
pub use resolve::{resolve_base, resolve_reference};
pub use resume::{ResumeActivator, ResumeOutcome};
pub use state::LoaderState;
pub use symbol::SymbolRef;
