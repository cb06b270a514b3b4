//! Fixed-size worker pool for one wave of URLs
//!
//! This module handles:
//! - Spawning `concurrency` workers into a `JoinSet`
//! - Sharing the wave's URLs through a mutex-guarded queue
//! - Streaming outcomes back over an unbounded channel
//! - Joining workers and reporting URLs a panicked worker never finished

use crate::crawler::worker::{PageOutcome, PageTask};
use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::mpsc;
use tokio::task::JoinSet;

/// Pool of async workers sharing one task
///
/// The pool itself is cheap to keep around; workers only exist while a
/// [`Wave`] is running.
pub struct WorkerPool<P> {
    task: Arc<P>,
    concurrency: usize,
}

impl<P: PageTask> WorkerPool<P> {
    /// Creates a pool; `concurrency` is clamped to at least one worker
    pub fn new(task: P, concurrency: usize) -> Self {
        Self {
            task: Arc::new(task),
            concurrency: concurrency.max(1),
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Starts processing a wave of URLs
    ///
    /// Spawns `min(concurrency, urls.len())` workers. Each pops the next URL
    /// from the shared queue until it is empty. Must be called from within a
    /// Tokio runtime.
    pub fn spawn(&self, urls: Vec<String>) -> Wave {
        let pending: HashSet<String> = urls.iter().cloned().collect();
        let worker_count = self.concurrency.min(urls.len());
        let queue = Arc::new(Mutex::new(VecDeque::from(urls)));
        let (tx, rx) = mpsc::unbounded_channel();

        let mut workers = JoinSet::new();
        for id in 0..worker_count {
            let task = Arc::clone(&self.task);
            let queue = Arc::clone(&queue);
            let tx = tx.clone();
            workers.spawn(run_worker(id, task, queue, tx));
        }

        tracing::debug!(
            "Spawned {} worker(s) for {} URL(s)",
            worker_count,
            pending.len()
        );

        // Workers hold the only senders; the channel closes once all exit
        drop(tx);

        Wave {
            outcomes: rx,
            workers,
            pending,
        }
    }
}

/// Worker loop: pop, process, send, until the queue is empty
async fn run_worker<P: PageTask>(
    id: usize,
    task: Arc<P>,
    queue: Arc<Mutex<VecDeque<String>>>,
    tx: mpsc::UnboundedSender<PageOutcome>,
) {
    loop {
        let next = queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();

        let Some(url) = next else {
            break;
        };

        tracing::trace!("Worker {} processing {}", id, url);
        let outcome = task.run(url).await;

        if tx.send(outcome).is_err() {
            tracing::debug!("Worker {} stopping: receiver dropped", id);
            break;
        }
    }
}

/// A running wave
///
/// Drain it with [`Wave::next_outcome`] until it returns `None`, then call
/// [`Wave::finish`] to join the workers.
pub struct Wave {
    outcomes: mpsc::UnboundedReceiver<PageOutcome>,
    workers: JoinSet<()>,
    pending: HashSet<String>,
}

impl Wave {
    /// Next outcome in completion order; `None` once every worker has exited
    pub async fn next_outcome(&mut self) -> Option<PageOutcome> {
        let outcome = self.outcomes.recv().await?;
        self.pending.remove(&outcome.url);
        Some(outcome)
    }

    /// Number of dispatched URLs without an outcome yet
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Joins every worker and returns the URLs that never produced an outcome
    ///
    /// The list is only non-empty when a worker panicked. It is sorted so
    /// failure accounting is deterministic.
    pub async fn finish(mut self) -> Vec<String> {
        // Anything still buffered counts as finished work
        while let Ok(outcome) = self.outcomes.try_recv() {
            tracing::warn!("Outcome for {} arrived after the wave drained", outcome.url);
            self.pending.remove(&outcome.url);
        }

        while let Some(joined) = self.workers.join_next().await {
            if let Err(e) = joined {
                if e.is_panic() {
                    tracing::error!("Worker panicked: {}", e);
                } else {
                    tracing::error!("Worker did not complete: {}", e);
                }
            }
        }

        let mut unfinished: Vec<String> = self.pending.into_iter().collect();
        unfinished.sort();
        unfinished
    }
}
