/**
 * Task Status Registry
 *
 * This module owns the mapping from task id to task status. It is the only
 * place task state lives; executing work refers to its record by id alone.
 *
 * # Concurrency
 *
 * The map sits behind one `std::sync::Mutex`. Every operation (allocate,
 * transition, poll, sweep) runs inside a single critical section, so:
 * - the collision check and the insert of a new id cannot interleave with
 *   another allocation,
 * - a terminal status is read and removed atomically, so racing polls see
 *   it exactly once.
 *
 * The lock is never held across an `.await`, which keeps it usable from
 * async handlers and from worker-pool threads alike.
 */

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;
use uuid::Uuid;

use crate::backend::tasks::error::TaskError;
use crate::shared::{TaskId, TaskStatus};

/// Source of candidate task ids
pub trait TaskIdGenerator: Send + Sync {
    fn generate(&self) -> TaskId;
}

/// Random UUIDv4 ids in canonical hyphenated form
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl TaskIdGenerator for UuidGenerator {
    fn generate(&self) -> TaskId {
        Uuid::new_v4().to_string()
    }
}

#[derive(Debug, Clone, Copy)]
struct TaskRecord {
    status: TaskStatus,
    updated_at: Instant,
}

impl TaskRecord {
    fn new(status: TaskStatus) -> Self {
        Self {
            status,
            updated_at: Instant::now(),
        }
    }
}

/// Shared task status store
///
/// Cloning is cheap and every clone refers to the same map.
#[derive(Clone)]
pub struct TaskRegistry {
    records: Arc<Mutex<HashMap<TaskId, TaskRecord>>>,
    ids: Arc<dyn TaskIdGenerator>,
    max_attempts: u32,
}

impl std::fmt::Debug for TaskRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskRegistry")
            .field("records", &self.len())
            .field("max_attempts", &self.max_attempts)
            .finish()
    }
}

impl TaskRegistry {
    /// Create an empty registry issuing UUIDv4 ids
    pub fn new(max_attempts: u32) -> Self {
        Self::with_generator(max_attempts, Arc::new(UuidGenerator))
    }

    /// Create an empty registry with a custom id source
    pub fn with_generator(max_attempts: u32, ids: Arc<dyn TaskIdGenerator>) -> Self {
        Self {
            records: Arc::new(Mutex::new(HashMap::new())),
            ids,
            max_attempts: max_attempts.max(1),
        }
    }

    fn records(&self) -> MutexGuard<'_, HashMap<TaskId, TaskRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Reserve a fresh id and record it as `ACCEPTED`
    ///
    /// # Errors
    ///
    /// `AllocationExhausted` when every candidate collided with a live record.
    pub fn allocate(&self) -> Result<TaskId, TaskError> {
        let mut records = self.records();
        for attempt in 1..=self.max_attempts {
            let candidate = self.ids.generate();
            if records.contains_key(&candidate) {
                tracing::warn!("[Tasks] Task id collision on attempt {}: {}", attempt, candidate);
                continue;
            }
            records.insert(candidate.clone(), TaskRecord::new(TaskStatus::Accepted));
            return Ok(candidate);
        }

        tracing::error!("[Tasks] Task id allocation exhausted after {} attempts", self.max_attempts);
        Err(TaskError::AllocationExhausted {
            attempts: self.max_attempts,
        })
    }

    /// Insert a record under a known id unless one already exists
    ///
    /// Returns `false` when the id is taken.
    pub fn insert(&self, task_id: impl Into<TaskId>, status: TaskStatus) -> bool {
        let mut records = self.records();
        let task_id = task_id.into();
        if records.contains_key(&task_id) {
            return false;
        }
        records.insert(task_id, TaskRecord::new(status));
        true
    }

    /// Move a task to `next` if that respects the forward-only order
    ///
    /// Returns `false` (and changes nothing) for unknown ids and for
    /// backward or repeated transitions.
    pub fn transition(&self, task_id: &str, next: TaskStatus) -> bool {
        let mut records = self.records();
        let Some(record) = records.get_mut(task_id) else {
            tracing::debug!("[Tasks] Transition to {} for unknown task {}", next, task_id);
            return false;
        };

        if !record.status.can_transition_to(next) {
            tracing::warn!(
                "[Tasks] Ignoring transition {} -> {} for task {}",
                record.status,
                next,
                task_id
            );
            return false;
        }

        record.status = next;
        record.updated_at = Instant::now();
        true
    }

    /// Report the status of a task, consuming it if terminal
    ///
    /// # Errors
    ///
    /// `NotFound` for ids that were never issued or whose terminal status
    /// has already been read.
    pub fn poll(&self, task_id: &str) -> Result<TaskStatus, TaskError> {
        let mut records = self.records();
        let status = records
            .get(task_id)
            .map(|record| record.status)
            .ok_or_else(|| TaskError::not_found(task_id))?;

        if status.is_terminal() {
            records.remove(task_id);
            tracing::debug!("[Tasks] Terminal status {} consumed for task {}", status, task_id);
        }
        Ok(status)
    }

    /// Current status without consuming it
    pub fn peek(&self, task_id: &str) -> Option<TaskStatus> {
        self.records().get(task_id).map(|record| record.status)
    }

    /// Drop a record regardless of its status
    pub fn remove(&self, task_id: &str) -> bool {
        self.records().remove(task_id).is_some()
    }

    /// Drop terminal records last updated more than `retention` before `now`
    ///
    /// Returns the number of records removed. Running tasks are never swept.
    pub fn purge_stale_terminal(&self, retention: Duration, now: Instant) -> usize {
        let mut records = self.records();
        let before = records.len();
        records.retain(|_, record| {
            !(record.status.is_terminal() && now.saturating_duration_since(record.updated_at) >= retention)
        });
        before - records.len()
    }

    /// Number of live records
    pub fn len(&self) -> usize {
        self.records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records().is_empty()
    }
}

impl Default for TaskRegistry {
    fn default() -> Self {
        Self::new(3)
    }
}
