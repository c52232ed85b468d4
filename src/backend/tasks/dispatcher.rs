/**
 * Task Dispatcher
 *
 * Accepts a unit of work, records it as ACCEPTED, and hands it to one of two
 * execution media:
 *
 * - **Deferred** - a tokio task that runs after the submitting request has
 *   been answered. Used for I/O-bound work.
 * - **Worker pool** - a blocking thread from the bounded [`WorkerPool`].
 *   Used for CPU-bound work.
 *
 * The dispatcher never blocks the caller. Status moves forward only:
 * ACCEPTED -> IN_PROGRESS -> COMPLETED | FAILED. A job that returns an error
 * or panics ends in FAILED, so no record is left stuck in IN_PROGRESS.
 *
 * # Ordering
 *
 * For pool jobs the pool slot is reserved before the id is allocated, so a
 * rejected submission never leaves a record behind. The job is queued on the
 * pool before `dispatch` returns, so pool jobs start in submission order.
 */

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;

use crate::backend::tasks::error::TaskError;
use crate::backend::tasks::pool::{PoolSlot, WorkerPool};
use crate::backend::tasks::registry::TaskRegistry;
use crate::shared::config::TaskSettings;
use crate::shared::{ExecutionMedium, TaskId, TaskReceipt, TaskStatus, WorkKind};

/// Error reported by a job body
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct WorkError(pub String);

impl WorkError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

pub type JobResult = Result<(), WorkError>;

/// A unit of work and the medium it runs on
pub enum Job {
    Deferred(BoxFuture<'static, JobResult>),
    WorkerPool(Box<dyn FnOnce() -> JobResult + Send + 'static>),
}

impl Job {
    pub fn deferred<F>(work: F) -> Self
    where
        F: Future<Output = JobResult> + Send + 'static,
    {
        Self::Deferred(work.boxed())
    }

    pub fn blocking<F>(work: F) -> Self
    where
        F: FnOnce() -> JobResult + Send + 'static,
    {
        Self::WorkerPool(Box::new(work))
    }

    /// Stand-in workload: sleep for `duration` on the medium `kind` maps to
    pub fn simulated(kind: WorkKind, duration: Duration) -> Self {
        match kind.medium() {
            ExecutionMedium::Deferred => Self::deferred(async move {
                tokio::time::sleep(duration).await;
                Ok(())
            }),
            ExecutionMedium::WorkerPool => Self::blocking(move || {
                std::thread::sleep(duration);
                Ok(())
            }),
        }
    }

    pub fn medium(&self) -> ExecutionMedium {
        match self {
            Self::Deferred(_) => ExecutionMedium::Deferred,
            Self::WorkerPool(_) => ExecutionMedium::WorkerPool,
        }
    }
}

impl std::fmt::Debug for Job {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Job").field(&self.medium()).finish()
    }
}

/// Submits jobs and answers status polls
#[derive(Clone, Debug)]
pub struct Dispatcher {
    registry: TaskRegistry,
    pool: WorkerPool,
}

impl Dispatcher {
    pub fn new(registry: TaskRegistry, pool: WorkerPool) -> Self {
        Self { registry, pool }
    }

    pub fn from_settings(settings: &TaskSettings) -> Self {
        Self::new(
            TaskRegistry::new(settings.allocation_attempts),
            WorkerPool::new(settings.worker_count, settings.max_queued),
        )
    }

    pub fn registry(&self) -> &TaskRegistry {
        &self.registry
    }

    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    /// Accept `job` and return its receipt without waiting for it
    pub fn submit(&self, job: Job) -> Result<TaskReceipt, TaskError> {
        self.dispatch(job).map(|(receipt, _)| receipt)
    }

    /// Like [`submit`](Self::submit), also returning the handle of the task
    /// that supervises the job. Dropping the handle does not cancel the job.
    pub fn dispatch(&self, job: Job) -> Result<(TaskReceipt, JoinHandle<()>), TaskError> {
        let (task_id, handle) = match job {
            Job::Deferred(work) => {
                let task_id = self.registry.allocate()?;
                let handle = self.spawn_deferred(task_id.clone(), work);
                (task_id, handle)
            }
            Job::WorkerPool(work) => {
                let slot = self.pool.try_reserve()?;
                let task_id = self.registry.allocate()?;
                let handle = self.spawn_on_pool(slot, task_id.clone(), work);
                (task_id, handle)
            }
        };

        tracing::debug!("[Tasks] Accepted task {}", task_id);
        Ok((TaskReceipt::new(task_id, TaskStatus::Accepted), handle))
    }

    /// Read a task's status; terminal statuses are consumed by the read
    pub fn poll(&self, task_id: &str) -> Result<TaskReceipt, TaskError> {
        let status = self.registry.poll(task_id)?;
        Ok(TaskReceipt::new(task_id, status))
    }

    fn spawn_deferred(&self, task_id: TaskId, work: BoxFuture<'static, JobResult>) -> JoinHandle<()> {
        let registry = self.registry.clone();
        tokio::spawn(async move {
            registry.transition(&task_id, TaskStatus::InProgress);
            // Run the body in its own task so a panic surfaces as a JoinError
            let outcome = match tokio::spawn(work).await {
                Ok(result) => result,
                Err(err) => Err(WorkError::new(err.to_string())),
            };
            settle(&registry, &task_id, outcome);
        })
    }

    fn spawn_on_pool(
        &self,
        slot: PoolSlot,
        task_id: TaskId,
        work: Box<dyn FnOnce() -> JobResult + Send + 'static>,
    ) -> JoinHandle<()> {
        let registry = self.registry.clone();
        let worker_registry = registry.clone();
        let worker_id = task_id.clone();
        // Queued here, before the supervising task exists, to keep FIFO order
        let running = slot.run(move || {
            worker_registry.transition(&worker_id, TaskStatus::InProgress);
            work()
        });
        tokio::spawn(async move {
            let outcome = running
                .await
                .unwrap_or_else(|failure| Err(WorkError::new(failure.to_string())));
            settle(&registry, &task_id, outcome);
        })
    }
}

fn settle(registry: &TaskRegistry, task_id: &str, outcome: JobResult) {
    let status = match outcome {
        Ok(()) => {
            tracing::debug!("[Tasks] Task {} completed", task_id);
            TaskStatus::Completed
        }
        Err(err) => {
            tracing::warn!("[Tasks] Task {} failed: {}", task_id, err);
            TaskStatus::Failed
        }
    };
    registry.transition(task_id, status);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dispatcher(workers: usize, max_queued: Option<usize>) -> Dispatcher {
        Dispatcher::new(TaskRegistry::new(3), WorkerPool::new(workers, max_queued))
    }

    #[tokio::test(start_paused = true)]
    async fn deferred_job_walks_through_every_status() {
        let dispatcher = dispatcher(1, None);
        let (receipt, handle) = dispatcher
            .dispatch(Job::simulated(WorkKind::IoBound, Duration::from_secs(10)))
            .unwrap();

        assert_eq!(receipt.status, TaskStatus::Accepted);
        assert_eq!(dispatcher.registry().peek(&receipt.task_id), Some(TaskStatus::Accepted));

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(dispatcher.poll(&receipt.task_id).unwrap().status, TaskStatus::InProgress);

        handle.await.unwrap();
        assert_eq!(dispatcher.poll(&receipt.task_id).unwrap().status, TaskStatus::Completed);
        assert_eq!(
            dispatcher.poll(&receipt.task_id),
            Err(TaskError::not_found(receipt.task_id.clone()))
        );
    }

    #[tokio::test]
    async fn pool_job_completes() {
        let dispatcher = dispatcher(2, None);
        let (receipt, handle) = dispatcher
            .dispatch(Job::simulated(WorkKind::CpuBound, Duration::from_millis(20)))
            .unwrap();

        handle.await.unwrap();
        assert_eq!(dispatcher.poll(&receipt.task_id).unwrap().status, TaskStatus::Completed);
    }

    #[tokio::test]
    async fn failing_jobs_end_in_failed() {
        let dispatcher = dispatcher(1, None);

        let (io, io_handle) = dispatcher
            .dispatch(Job::deferred(async { Err(WorkError::new("upstream refused")) }))
            .unwrap();
        let (cpu, cpu_handle) = dispatcher
            .dispatch(Job::blocking(|| Err(WorkError::new("bad input"))))
            .unwrap();

        io_handle.await.unwrap();
        cpu_handle.await.unwrap();
        assert_eq!(dispatcher.poll(&io.task_id).unwrap().status, TaskStatus::Failed);
        assert_eq!(dispatcher.poll(&cpu.task_id).unwrap().status, TaskStatus::Failed);
    }

    #[tokio::test]
    async fn panicking_jobs_end_in_failed() {
        let dispatcher = dispatcher(1, None);

        let (io, io_handle) = dispatcher
            .dispatch(Job::deferred(async { panic!("deferred crash") }))
            .unwrap();
        let (cpu, cpu_handle) = dispatcher
            .dispatch(Job::blocking(|| panic!("worker crash")))
            .unwrap();

        io_handle.await.unwrap();
        cpu_handle.await.unwrap();
        assert_eq!(dispatcher.poll(&io.task_id).unwrap().status, TaskStatus::Failed);
        assert_eq!(dispatcher.poll(&cpu.task_id).unwrap().status, TaskStatus::Failed);
    }

    #[tokio::test]
    async fn rejected_submission_leaves_no_record() {
        let dispatcher = dispatcher(1, Some(0));
        let (_, running) = dispatcher
            .dispatch(Job::simulated(WorkKind::CpuBound, Duration::from_millis(50)))
            .unwrap();

        let rejected = dispatcher.submit(Job::simulated(WorkKind::CpuBound, Duration::ZERO));
        assert_eq!(rejected, Err(TaskError::CapacityRejected { limit: 0 }));
        assert_eq!(dispatcher.registry().len(), 1);

        running.await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn pool_jobs_start_in_submission_order() {
        let dispatcher = dispatcher(1, None);
        let started = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));

        let submitted: Vec<_> = (0..5)
            .map(|index| {
                let started = started.clone();
                dispatcher
                    .dispatch(Job::blocking(move || {
                        started.lock().unwrap().push(index);
                        std::thread::sleep(Duration::from_millis(5));
                        Ok(())
                    }))
                    .unwrap()
            })
            .collect();

        for (receipt, handle) in submitted {
            handle.await.unwrap();
            assert_eq!(dispatcher.poll(&receipt.task_id).unwrap().status, TaskStatus::Completed);
        }
        assert_eq!(*started.lock().unwrap(), vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn saturated_pool_queues_and_keeps_accepting() {
        let dispatcher = dispatcher(1, None);
        let receipts: Vec<_> = (0..4)
            .map(|_| {
                dispatcher
                    .dispatch(Job::simulated(WorkKind::CpuBound, Duration::from_millis(10)))
                    .unwrap()
            })
            .collect();

        for (receipt, handle) in receipts {
            assert_eq!(receipt.status, TaskStatus::Accepted);
            handle.await.unwrap();
            assert_eq!(dispatcher.poll(&receipt.task_id).unwrap().status, TaskStatus::Completed);
        }
    }
}
