//! # Web API Route Definitions
//!
//! HTTP route structure for the pipeline API, grouped into public health
//! routes and bearer-protected `/api` routes.

use axum::routing::{get, post};
use axum::Router;

use crate::web::handlers;
use crate::web::state::AppState;

/// Protected API routes (mounted under `/api`):
/// - Models API - training and prediction dispatch
/// - Tasks API - status polling and result fetch
/// - Data management API - dataset upload and metadata
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/test", get(handlers::health::api_probe))
        // Models API
        .route("/models/train", post(handlers::models::train_model))
        .route("/models/predict", post(handlers::models::predict))
        // Tasks API
        .route("/tasks/check/:task_id", get(handlers::tasks::check_task))
        // Data management API
        .route(
            "/data-management/upload/file",
            post(handlers::data::upload_file),
        )
        .route(
            "/data-management/metadata/:filename",
            get(handlers::data::file_metadata),
        )
        .route(
            "/data-management/feedback",
            post(handlers::data::submit_feedback),
        )
}

/// Public health routes, available without authentication.
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
