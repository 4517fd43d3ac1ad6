//! # Health Check Handlers
//!
//! Liveness endpoints for monitoring and load balancing. The service is
//! healthy as long as it can accept requests; backend reachability surfaces
//! through the task endpoints themselves.

use axum::Json;
use serde_json::{json, Value};

/// Basic health check endpoint: `GET /health`. Always public.
pub async fn health() -> Json<Value> {
    Json(json!({"status": "OK"}))
}

/// API router probe: `GET /api/test`. Confirms routing and authentication
/// are wired, without touching any backend.
pub async fn api_probe() -> Json<Value> {
    Json(json!({"status": "OK", "version": env!("CARGO_PKG_VERSION")}))
}
