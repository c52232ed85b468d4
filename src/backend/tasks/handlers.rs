/**
 * Task Handlers
 *
 * HTTP surface for the dispatcher:
 *
 * - `POST /v1/async/io-bound` - submit simulated I/O-bound work (deferred)
 * - `POST /v1/async/cpu-bound` - submit simulated CPU-bound work (worker pool)
 * - `GET /v1/async/result/{task_id}` - poll a task's status
 *
 * Submissions answer immediately with `{task_id, status: "ACCEPTED"}`.
 * A poll that observes COMPLETED or FAILED consumes the record; the next poll
 * for the same id is answered with 400 "Not Found".
 */

use axum::{
    extract::{Path, State},
    response::Json,
};
use std::sync::Arc;

use crate::backend::error::BackendError;
use crate::backend::tasks::dispatcher::{Dispatcher, Job};
use crate::shared::{AppConfig, TaskReceipt, WorkKind};

/// Submit simulated I/O-bound work
///
/// # Example Response
///
/// ```json
/// { "task_id": "0b6f8c3e-5f0a-4f55-9d7e-0c1a3f6b2a11", "status": "ACCEPTED" }
/// ```
pub async fn submit_io_bound(
    State(dispatcher): State<Dispatcher>,
    State(config): State<Arc<AppConfig>>,
) -> Result<Json<TaskReceipt>, BackendError> {
    submit(&dispatcher, WorkKind::IoBound, &config)
}

/// Submit simulated CPU-bound work
///
/// # Errors
///
/// * `503 Service Unavailable` - the pool queue is bounded and full
pub async fn submit_cpu_bound(
    State(dispatcher): State<Dispatcher>,
    State(config): State<Arc<AppConfig>>,
) -> Result<Json<TaskReceipt>, BackendError> {
    submit(&dispatcher, WorkKind::CpuBound, &config)
}

fn submit(dispatcher: &Dispatcher, kind: WorkKind, config: &AppConfig) -> Result<Json<TaskReceipt>, BackendError> {
    let duration = match kind {
        WorkKind::IoBound => config.tasks.io_work_duration,
        WorkKind::CpuBound => config.tasks.cpu_work_duration,
    };

    let receipt = dispatcher.submit(Job::simulated(kind, duration)).map_err(|e| {
        tracing::error!("[Tasks] {:?} submission refused: {}", kind, e);
        e
    })?;

    tracing::info!("[Tasks] {:?} task {} accepted", kind, receipt.task_id);
    Ok(Json(receipt))
}

/// Poll a task's status
///
/// # Errors
///
/// * `400 Bad Request` ("Not Found") - unknown or already-consumed id
pub async fn get_task_result(
    State(dispatcher): State<Dispatcher>,
    Path(task_id): Path<String>,
) -> Result<Json<TaskReceipt>, BackendError> {
    let receipt = dispatcher.poll(&task_id).map_err(|e| {
        tracing::debug!("[Tasks] Poll for {} failed: {}", task_id, e);
        e
    })?;
    Ok(Json(receipt))
}
