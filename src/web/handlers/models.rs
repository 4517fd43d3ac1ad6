//! # Model Handlers
//!
//! HTTP handlers that dispatch model training and inference jobs. Both are
//! fire-and-forget: the response carries a task handle the caller polls via
//! the tasks API.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::json;
use tracing::info;

use crate::dispatch::Operation;
use crate::models::{AsyncTaskResponse, TrainRequest, UserFeatureRecord};
use crate::web::response_types::ApiResult;
use crate::web::state::AppState;

/// `POST /api/models/train` - enqueue a model training job.
///
/// Returns `202 Accepted` with the issued handle; training itself happens in
/// the worker pool.
pub async fn train_model(
    State(state): State<AppState>,
    Json(request): Json<TrainRequest>,
) -> ApiResult<(StatusCode, Json<AsyncTaskResponse>)> {
    let parameters = json!({
        "optimize_hyperparams": request.optimize_hyperparams,
        "include_user_data": request.include_user_data,
    });

    let handle = state
        .gateway
        .submit(
            Operation::TrainModel,
            &state.config.queue.default_queue,
            parameters,
        )
        .await?;

    info!(task_id = %handle.id, "Training job accepted");
    Ok((StatusCode::ACCEPTED, Json(handle.into())))
}

/// `POST /api/models/predict` - enqueue an inference job for one record.
///
/// The record is validated before anything is enqueued; a malformed payload
/// never reaches the queue backend.
pub async fn predict(
    State(state): State<AppState>,
    Json(record): Json<UserFeatureRecord>,
) -> ApiResult<(StatusCode, Json<AsyncTaskResponse>)> {
    record.validate()?;

    let parameters = json!({"features": record});
    let handle = state
        .gateway
        .submit(
            Operation::Predict,
            &state.config.queue.default_queue,
            parameters,
        )
        .await?;

    info!(task_id = %handle.id, "Prediction job accepted");
    Ok((StatusCode::ACCEPTED, Json(handle.into())))
}
