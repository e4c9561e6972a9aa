//! Prefetch worker
//!
//! The loader posts ordered lists of absolute module URLs; this crate receives
//! them on a background thread and fetches each URL once so that later imports
//! hit a warm cache. Fetched code is never evaluated.
//!
//! ## Usage
//!
//! ```ignore
//! use qwikloader_prefetch::{HttpFetcher, ThreadWorkerFactory};
//!
//! let loader = Loader::new(options, registry, state)
//!     .with_worker_factory(ThreadWorkerFactory::new(HttpFetcher::new()?));
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod fetch;
pub mod worker;

pub use fetch::{FetchError, Fetcher};
#[cfg(feature = "http")]
pub use fetch::{HttpFetcher, REQUEST_TIMEOUT};
pub use worker::{ThreadWorker, ThreadWorkerFactory, WorkerStats};
