/**
 * Bounded Worker Pool
 *
 * Runs blocking jobs on tokio's blocking threads, at most `workers` at a
 * time. Jobs go into one FIFO queue at the moment they are handed to the
 * pool, and `workers` consumer loops take them off in that order. The queue
 * is unbounded unless `max_queued` is set, in which case `try_reserve`
 * refuses new work once that many jobs are already waiting.
 *
 * # Slots
 *
 * Callers reserve a [`PoolSlot`] before doing any other bookkeeping, so a
 * rejected submission leaves no trace. A slot that is dropped without
 * running gives its place back.
 *
 * # Workers
 *
 * The consumer loops are spawned on the current runtime the first time a
 * job is queued, and exit once every handle to the pool is gone and the
 * queue is drained.
 */

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, Mutex as AsyncMutex};

use crate::backend::tasks::error::TaskError;

type QueuedJob = Box<dyn FnOnce() + Send + 'static>;
type JobQueue = Arc<AsyncMutex<mpsc::UnboundedReceiver<QueuedJob>>>;

/// Why a pool job did not produce a value
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WorkerFailure {
    #[error("worker panicked: {0}")]
    Panicked(String),
    #[error("worker pool is shut down")]
    Closed,
}

#[derive(Debug)]
struct PoolShared {
    sender: mpsc::UnboundedSender<QueuedJob>,
    receiver: JobQueue,
    started: Once,
    /// Jobs reserved and not yet finished (waiting + running)
    outstanding: AtomicUsize,
    running: AtomicUsize,
    workers: usize,
    max_queued: Option<usize>,
}

impl PoolShared {
    fn start_workers(&self) {
        self.started.call_once(|| {
            tracing::debug!("[Tasks] Starting {} pool workers", self.workers);
            for worker in 0..self.workers {
                tokio::spawn(worker_loop(worker, self.receiver.clone()));
            }
        });
    }
}

/// Fixed-size pool of blocking workers
#[derive(Clone, Debug)]
pub struct WorkerPool {
    shared: Arc<PoolShared>,
}

impl WorkerPool {
    pub fn new(workers: usize, max_queued: Option<usize>) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            shared: Arc::new(PoolShared {
                sender,
                receiver: Arc::new(AsyncMutex::new(receiver)),
                started: Once::new(),
                outstanding: AtomicUsize::new(0),
                running: AtomicUsize::new(0),
                workers: workers.max(1),
                max_queued,
            }),
        }
    }

    /// Claim a place for one job
    ///
    /// # Errors
    ///
    /// `CapacityRejected` when a queue bound is configured and already reached.
    pub fn try_reserve(&self) -> Result<PoolSlot, TaskError> {
        let shared = &self.shared;
        let mut current = shared.outstanding.load(Ordering::Acquire);
        loop {
            if let Some(limit) = shared.max_queued {
                if current >= shared.workers + limit {
                    tracing::warn!("[Tasks] Worker pool saturated: {} outstanding jobs", current);
                    return Err(TaskError::CapacityRejected { limit });
                }
            }
            match shared
                .outstanding
                .compare_exchange_weak(current, current + 1, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => {
                    return Ok(PoolSlot {
                        shared: self.shared.clone(),
                    })
                }
                Err(actual) => current = actual,
            }
        }
    }

    pub fn workers(&self) -> usize {
        self.shared.workers
    }

    /// Jobs currently running on a worker
    pub fn running(&self) -> usize {
        self.shared.running.load(Ordering::Acquire)
    }

    /// Jobs reserved but still waiting for a worker
    pub fn queued(&self) -> usize {
        self.shared
            .outstanding
            .load(Ordering::Acquire)
            .saturating_sub(self.running())
    }
}

/// A reserved place in the pool
#[derive(Debug)]
pub struct PoolSlot {
    shared: Arc<PoolShared>,
}

impl PoolSlot {
    /// Queue `job` now and return a future for its result
    ///
    /// The job takes its place in the queue before this returns, so jobs
    /// start in the order `run` was called, whenever the returned futures
    /// are first polled.
    pub fn run<F, T>(self, job: F) -> impl Future<Output = Result<T, WorkerFailure>> + Send + 'static
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let shared = self.shared.clone();

        let queued: QueuedJob = Box::new(move || {
            let slot = self;
            slot.shared.running.fetch_add(1, Ordering::AcqRel);
            let outcome = std::panic::catch_unwind(AssertUnwindSafe(job))
                .map_err(|payload| WorkerFailure::Panicked(panic_message(payload)));
            slot.shared.running.fetch_sub(1, Ordering::AcqRel);
            drop(slot);
            let _ = tx.send(outcome);
        });

        shared.start_workers();
        if shared.sender.send(queued).is_err() {
            tracing::error!("[Tasks] Worker pool queue is closed");
        }

        async move {
            match rx.await {
                Ok(outcome) => outcome,
                Err(_) => Err(WorkerFailure::Closed),
            }
        }
    }
}

impl Drop for PoolSlot {
    fn drop(&mut self) {
        self.shared.outstanding.fetch_sub(1, Ordering::AcqRel);
    }
}

async fn worker_loop(worker: usize, queue: JobQueue) {
    loop {
        let next = queue.lock().await.recv().await;
        let Some(job) = next else {
            tracing::debug!("[Tasks] Pool worker {} stopping", worker);
            return;
        };
        if let Err(err) = tokio::task::spawn_blocking(job).await {
            tracing::error!("[Tasks] Pool worker {} lost a job: {}", worker, err);
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;
    use std::time::Duration;

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn never_runs_more_than_worker_count() {
        let pool = WorkerPool::new(2, None);
        let active = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..6)
            .map(|_| {
                let slot = pool.try_reserve().unwrap();
                let active = active.clone();
                let peak = peak.clone();
                tokio::spawn(slot.run(move || {
                    let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    std::thread::sleep(Duration::from_millis(30));
                    active.fetch_sub(1, Ordering::SeqCst);
                }))
            })
            .collect();

        for handle in handles {
            handle.await.unwrap().unwrap();
        }
        assert_eq!(peak.load(Ordering::SeqCst), 2);
        assert_eq!(pool.queued(), 0);
        assert_eq!(pool.running(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn jobs_start_in_submission_order() {
        let pool = WorkerPool::new(1, None);
        let started = Arc::new(Mutex::new(Vec::new()));

        let pending: Vec<_> = (0..5)
            .map(|index| {
                let started = started.clone();
                pool.try_reserve().unwrap().run(move || {
                    started.lock().unwrap().push(index);
                    std::thread::sleep(Duration::from_millis(5));
                })
            })
            .collect();

        // spawned in reverse so polling order cannot matter
        let handles: Vec<_> = pending.into_iter().map(tokio::spawn).rev().collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }
        assert_eq!(*started.lock().unwrap(), vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn queue_bound_rejects_overflow() {
        let pool = WorkerPool::new(1, Some(1));
        let first = pool.try_reserve().unwrap();
        let second = pool.try_reserve().unwrap();

        assert_eq!(pool.try_reserve().unwrap_err(), TaskError::CapacityRejected { limit: 1 });

        drop(first);
        let third = pool.try_reserve();
        assert!(third.is_ok());
        drop(second);
    }

    #[tokio::test]
    async fn unbounded_pool_accepts_everything() {
        let pool = WorkerPool::new(1, None);
        let slots: Vec<_> = (0..100).map(|_| pool.try_reserve().unwrap()).collect();
        assert_eq!(pool.queued(), 100);
        drop(slots);
        assert_eq!(pool.queued(), 0);
    }

    #[tokio::test]
    async fn panics_are_reported() {
        let pool = WorkerPool::new(1, None);
        let slot = pool.try_reserve().unwrap();
        let result: Result<(), _> = slot.run(|| panic!("boom")).await;
        assert_eq!(result, Err(WorkerFailure::Panicked("boom".to_string())));

        // the worker survived
        let slot = pool.try_reserve().unwrap();
        assert_eq!(slot.run(|| 7).await, Ok(7));
        assert_eq!(pool.queued(), 0);
    }
}
