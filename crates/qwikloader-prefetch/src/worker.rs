//! Background thread receiving prefetch messages

use crate::fetch::Fetcher;
use crossbeam::channel::{self, Receiver, Sender};
use qwikloader_core::{PrefetchWorker, WorkerFactory};
use rustc_hash::FxHashSet;
use std::io;
use std::thread;

/// Counters returned when a worker shuts down
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerStats {
    /// Messages received
    pub messages: usize,
    /// URLs fetched successfully
    pub fetched: usize,
    /// URLs skipped because they were requested before
    pub skipped: usize,
    /// URLs whose fetch failed
    pub failed: usize,
}

/// Prefetch worker running on its own thread
///
/// URLs are fetched in the order they were posted. Each distinct URL is
/// requested at most once per worker, whether or not the first attempt
/// succeeded.
pub struct ThreadWorker {
    sender: Option<Sender<Vec<String>>>,
    handle: Option<thread::JoinHandle<WorkerStats>>,
}

impl ThreadWorker {
    /// Start the worker thread
    pub fn spawn<F>(fetcher: F) -> io::Result<Self>
    where
        F: Fetcher + Send + 'static,
    {
        let (sender, receiver) = channel::unbounded();
        let handle = thread::Builder::new()
            .name("qwikloader-prefetch".to_string())
            .spawn(move || Self::run_loop(receiver, fetcher))?;

        Ok(Self {
            sender: Some(sender),
            handle: Some(handle),
        })
    }

    /// Queue one ordered list; `false` if the worker has stopped
    pub fn post(&self, urls: Vec<String>) -> bool {
        match &self.sender {
            Some(sender) => sender.send(urls).is_ok(),
            None => false,
        }
    }

    /// Finish queued messages, stop the thread and return its counters
    pub fn shutdown(mut self) -> WorkerStats {
        self.stop()
    }

    fn stop(&mut self) -> WorkerStats {
        // Closing the channel ends the loop once the queue is empty
        self.sender.take();
        match self.handle.take().map(thread::JoinHandle::join) {
            Some(Ok(stats)) => stats,
            Some(Err(_)) => {
                tracing::error!("prefetch worker thread panicked");
                WorkerStats::default()
            }
            None => WorkerStats::default(),
        }
    }

    fn run_loop<F: Fetcher>(receiver: Receiver<Vec<String>>, fetcher: F) -> WorkerStats {
        let mut stats = WorkerStats::default();
        let mut seen = FxHashSet::default();

        for message in receiver {
            stats.messages += 1;
            tracing::debug!(count = message.len(), "prefetch message received");

            for url in message {
                if !seen.insert(url.clone()) {
                    stats.skipped += 1;
                    continue;
                }
                match fetcher.fetch(&url) {
                    Ok(()) => {
                        stats.fetched += 1;
                        tracing::trace!(%url, "prefetched");
                    }
                    Err(err) => {
                        stats.failed += 1;
                        tracing::warn!(%url, error = %err, "prefetch failed");
                    }
                }
            }
        }

        stats
    }
}

impl PrefetchWorker for ThreadWorker {
    fn post_message(&self, urls: Vec<String>) {
        if !self.post(urls) {
            tracing::warn!("prefetch worker is gone; message dropped");
        }
    }
}

impl Drop for ThreadWorker {
    fn drop(&mut self) {
        if self.handle.is_some() {
            self.stop();
        }
    }
}

impl std::fmt::Debug for ThreadWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreadWorker")
            .field("running", &self.handle.is_some())
            .finish()
    }
}

/// Creates a [`ThreadWorker`] per loader from a cloneable fetcher
#[derive(Debug, Clone)]
pub struct ThreadWorkerFactory<F> {
    fetcher: F,
}

impl<F> ThreadWorkerFactory<F>
where
    F: Fetcher + Clone + Send + 'static,
{
    /// Factory handing each worker a clone of `fetcher`
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }
}

impl<F> WorkerFactory for ThreadWorkerFactory<F>
where
    F: Fetcher + Clone + Send + 'static,
{
    fn spawn(&self) -> Option<Box<dyn PrefetchWorker>> {
        match ThreadWorker::spawn(self.fetcher.clone()) {
            Ok(worker) => Some(Box::new(worker)),
            Err(err) => {
                tracing::warn!(error = %err, "cannot start prefetch worker");
                None
            }
        }
    }
}
