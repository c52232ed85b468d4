//! Task Status Types
//!
//! Data types exchanged by the async task routes: the status of a submitted
//! unit of work, the receipt returned on submission and the work kinds a
//! client can ask for.
//!
//! # Status Lifecycle
//!
//! ```text
//! ACCEPTED -> IN_PROGRESS -> COMPLETED
//!                         -> FAILED
//! ```
//!
//! Statuses only move forward. A terminal status is reported to exactly one
//! poll and then forgotten by the server.

use serde::{Deserialize, Serialize};

/// Opaque task identifier (canonical UUIDv4 string).
pub type TaskId = String;

/// Current execution state of a submitted task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Recorded and scheduled, not started yet.
    Accepted,
    /// Work is running.
    InProgress,
    /// Work finished normally.
    Completed,
    /// Work returned an error or panicked.
    Failed,
}

impl TaskStatus {
    /// Wire representation, identical to the serde form.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Accepted => "ACCEPTED",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::Completed => "COMPLETED",
            TaskStatus::Failed => "FAILED",
        }
    }

    /// Returns `true` for statuses that never change again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }

    fn rank(&self) -> u8 {
        match self {
            TaskStatus::Accepted => 0,
            TaskStatus::InProgress => 1,
            TaskStatus::Completed | TaskStatus::Failed => 2,
        }
    }

    /// Whether moving from `self` to `next` respects the forward-only order.
    pub fn can_transition_to(&self, next: TaskStatus) -> bool {
        !self.is_terminal() && next.rank() > self.rank()
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Medium a unit of work runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecutionMedium {
    /// Spawned on the async runtime; the submitting request does not wait.
    Deferred,
    /// Runs on a blocking thread behind the fixed-size worker pool.
    WorkerPool,
}

/// Kind of work a client submits; selects the execution medium.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkKind {
    /// Mostly waiting on I/O.
    IoBound,
    /// Occupies a thread for its whole duration.
    CpuBound,
}

impl WorkKind {
    /// Static kind -> medium table.
    pub const fn medium(self) -> ExecutionMedium {
        match self {
            WorkKind::IoBound => ExecutionMedium::Deferred,
            WorkKind::CpuBound => ExecutionMedium::WorkerPool,
        }
    }
}

/// Body returned by submission and poll endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskReceipt {
    pub task_id: TaskId,
    pub status: TaskStatus,
}

impl TaskReceipt {
    pub fn new(task_id: impl Into<TaskId>, status: TaskStatus) -> Self {
        Self {
            task_id: task_id.into(),
            status,
        }
    }
}
