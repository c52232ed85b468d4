/**
 * Task Errors
 *
 * Failures surfaced by the task registry and dispatcher. Each one is scoped
 * to a single submit or poll call.
 */

use thiserror::Error;
use crate::shared::TaskId;

/// Errors returned by task submission and polling
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// No record exists for the id (never issued, or already consumed)
    #[error("task {task_id} not found")]
    NotFound {
        task_id: TaskId,
    },

    /// Every generated id collided with a live record
    #[error("could not allocate a unique task id after {attempts} attempts")]
    AllocationExhausted {
        attempts: u32,
    },

    /// The worker pool queue is at its configured bound
    #[error("worker pool is saturated ({limit} jobs already waiting)")]
    CapacityRejected {
        limit: usize,
    },
}

impl TaskError {
    pub fn not_found(task_id: impl Into<TaskId>) -> Self {
        Self::NotFound {
            task_id: task_id.into(),
        }
    }
}
