//! # Web API Module
//!
//! Axum-based HTTP surface of the pipeline service.
//!
//! ## Core Components
//!
//! - [`routes`] - HTTP route definitions and organization
//! - [`handlers`] - Request handlers per endpoint group
//! - [`middleware`] - Bearer authentication and request ids
//! - [`state`] - Shared application state (gateway, object store, config)
//! - [`response_types`] - API error types and HTTP conversions

pub mod handlers;
pub mod middleware;
pub mod response_types;
pub mod routes;
pub mod state;

use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use state::AppState;

/// Create the Axum application with all routes and middleware.
///
/// Health endpoints stay public; everything under `/api` passes the bearer
/// check. The middleware stack applies request ids, permissive CORS (the
/// service sits behind its own edge), request tracing, and a global timeout.
pub fn create_app(state: AppState) -> Router {
    let request_timeout = Duration::from_millis(state.config.http.request_timeout_ms);
    let upload_limit = state.config.max_upload_bytes();

    let public_routes = routes::health_routes();

    let protected_routes = Router::new()
        .nest("/api", routes::api_routes())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_bearer,
        ));

    // ServiceBuilder applies top to bottom: outermost layer first.
    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(
            ServiceBuilder::new()
                .layer(DefaultBodyLimit::max(upload_limit))
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(tower_http::cors::Any)
                        .allow_methods(tower_http::cors::Any)
                        .allow_headers(tower_http::cors::Any),
                )
                .layer(TimeoutLayer::new(request_timeout))
                .layer(axum::middleware::from_fn(
                    middleware::request_id::add_request_id,
                )),
        )
        .with_state(state)
}
