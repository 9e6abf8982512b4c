//! Bounded worker pool
//!
//! The work matrix is materialised up front and put in a shared queue.
//! Each worker pops the next item, probes it and pushes the outcome on a
//! results channel. Outcomes arrive in completion order, not submission
//! order.

use crate::config::ScanConfig;
use crate::error::ScanError;
use crate::scan::checker::ProbeExecutor;
use crate::scan::models::{ProbeOutcome, WorkItem};
use futures::future;
use log::{debug, error};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

type WorkQueue = Arc<Mutex<VecDeque<WorkItem>>>;

/// Stops workers from taking new items. In-flight probes still finish.
#[derive(Debug, Clone, Default)]
pub struct ShutdownHandle {
    stopped: Arc<AtomicBool>,
}

impl ShutdownHandle {
    pub fn trigger(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    pub fn is_triggered(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

/// Counts known once every worker has exited
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    /// Items handed to a worker
    pub dispatched: usize,
    /// Items left in the queue after an interrupt
    pub undispatched: usize,
}

/// Spreads work items over a fixed number of workers
pub struct Dispatcher {
    executor: ProbeExecutor,
    concurrency: usize,
    shutdown: ShutdownHandle,
}

impl Dispatcher {
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            executor: ProbeExecutor::new(config),
            concurrency: config.concurrency.max(1),
            shutdown: ShutdownHandle::default(),
        }
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    /// Start probing `work`.
    ///
    /// Refuses a work set that contains a target without a scheme. Must be
    /// called from within a tokio runtime.
    pub fn spawn(&self, work: Vec<WorkItem>) -> Result<ScanHandle, ScanError> {
        if let Some(item) = work.iter().find(|w| w.target.scheme().is_none()) {
            return Err(ScanError::Configuration(format!(
                "target '{}' has no scheme; enable at least one of http or https inference",
                item.target
            )));
        }

        let total = work.len();
        let workers = self.concurrency.min(total);
        let queue: WorkQueue = Arc::new(Mutex::new(VecDeque::from(work)));
        let (tx, rx) = mpsc::channel(self.concurrency * 2);

        debug!("Dispatching {} work items over {} workers", total, workers);

        let handles = (0..workers)
            .map(|id| {
                let queue = Arc::clone(&queue);
                let tx = tx.clone();
                let executor = self.executor.clone();
                let shutdown = self.shutdown.clone();

                tokio::spawn(async move {
                    let mut probed = 0usize;
                    while !shutdown.is_triggered() {
                        let Some(item) = next_item(&queue) else {
                            break;
                        };
                        let outcome = executor.probe(item).await;
                        probed += 1;
                        if tx.send(outcome).await.is_err() {
                            break;
                        }
                    }
                    debug!("Worker {} finished after {} probes", id, probed);
                })
            })
            .collect();

        Ok(ScanHandle {
            outcomes: rx,
            workers: handles,
            queue,
            total,
        })
    }
}

fn next_item(queue: &Mutex<VecDeque<WorkItem>>) -> Option<WorkItem> {
    queue.lock().pop_front()
}

/// A running scan. Drain it with [`ScanHandle::next_outcome`], then [`ScanHandle::join`].
pub struct ScanHandle {
    outcomes: mpsc::Receiver<ProbeOutcome>,
    workers: Vec<JoinHandle<()>>,
    queue: WorkQueue,
    total: usize,
}

impl ScanHandle {
    /// Number of work items in the scan
    pub fn total(&self) -> usize {
        self.total
    }

    /// Next outcome in arrival order; `None` once every worker has exited
    pub async fn next_outcome(&mut self) -> Option<ProbeOutcome> {
        self.outcomes.recv().await
    }

    /// Wait for the workers to exit
    pub async fn join(self) -> DispatchStats {
        drop(self.outcomes);

        for result in future::join_all(self.workers).await {
            if let Err(e) = result {
                error!("Worker task failed: {}", e);
            }
        }

        let undispatched = self.queue.lock().len();
        DispatchStats {
            dispatched: self.total - undispatched,
            undispatched,
        }
    }
}
