//! Crawl progress callbacks
//!
//! The coordinator reports status, progress, discovered links and non-fatal
//! errors through [`CrawlObserver`]. Front ends implement it to drive their
//! own display; the CLI uses [`TracingObserver`].

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Receives crawl events from the coordinator
///
/// Every method has a no-op default, so implementors only override what they
/// display. Callbacks run on the coordinator task and should return quickly.
pub trait CrawlObserver: Send + Sync {
    /// Human-readable status line, e.g. a phase change
    fn on_status(&self, _message: &str) {}

    /// Called after each completed unit of work
    fn on_progress(&self, _completed: usize, _total: usize) {}

    /// The in-scope links found on the seed page
    fn on_links_discovered(&self, _links: &[String]) {}

    /// A non-fatal problem, such as a page that exhausted its retries
    fn on_error(&self, _message: &str) {}
}

/// Observer that ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl CrawlObserver for NoopObserver {}

/// Observer that forwards events to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl CrawlObserver for TracingObserver {
    fn on_status(&self, message: &str) {
        tracing::info!("{}", message);
    }

    fn on_progress(&self, completed: usize, total: usize) {
        tracing::debug!("Progress: {}/{}", completed, total);
    }

    fn on_links_discovered(&self, links: &[String]) {
        tracing::info!("Discovered {} in-scope links", links.len());
        for link in links {
            tracing::trace!("  {}", link);
        }
    }

    fn on_error(&self, message: &str) {
        tracing::warn!("{}", message);
    }
}

/// Observer that keeps every event, for inspecting a crawl after the fact
#[derive(Debug, Default)]
pub struct RecordingObserver {
    statuses: Mutex<Vec<String>>,
    progress: Mutex<Vec<(usize, usize)>>,
    discovered: Mutex<Vec<String>>,
    errors: Mutex<Vec<String>>,
    progress_calls: AtomicUsize,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn statuses(&self) -> Vec<String> {
        lock(&self.statuses).clone()
    }

    /// Every `(completed, total)` pair in the order it was reported
    pub fn progress(&self) -> Vec<(usize, usize)> {
        lock(&self.progress).clone()
    }

    pub fn discovered(&self) -> Vec<String> {
        lock(&self.discovered).clone()
    }

    pub fn errors(&self) -> Vec<String> {
        lock(&self.errors).clone()
    }

    pub fn progress_calls(&self) -> usize {
        self.progress_calls.load(Ordering::Relaxed)
    }
}

impl CrawlObserver for RecordingObserver {
    fn on_status(&self, message: &str) {
        lock(&self.statuses).push(message.to_string());
    }

    fn on_progress(&self, completed: usize, total: usize) {
        self.progress_calls.fetch_add(1, Ordering::Relaxed);
        lock(&self.progress).push((completed, total));
    }

    fn on_links_discovered(&self, links: &[String]) {
        lock(&self.discovered).extend(links.iter().cloned());
    }

    fn on_error(&self, message: &str) {
        lock(&self.errors).push(message.to_string());
    }
}

/// Locks a mutex, recovering the data if a previous holder panicked
fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
