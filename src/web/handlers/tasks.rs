//! # Task Handlers
//!
//! Status polling and result fetch for previously dispatched jobs.

use axum::extract::{Path, State};
use axum::Json;
use tracing::debug;

use crate::dispatch::TaskId;
use crate::models::AsyncTaskResponse;
use crate::web::response_types::ApiResult;
use crate::web::state::AppState;

/// `GET /api/tasks/check/{task_id}` - current status, plus the result once
/// the task has succeeded. One backend read per request.
///
/// An id the backend has never seen reports `PENDING`; callers cannot
/// distinguish it from a genuinely queued task.
pub async fn check_task(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> ApiResult<Json<AsyncTaskResponse>> {
    let task_id = TaskId::from(task_id);
    let handle = state.gateway.check(&task_id).await?;

    debug!(task_id = %task_id, status = %handle.status, "Task checked");
    Ok(Json(handle.into()))
}
