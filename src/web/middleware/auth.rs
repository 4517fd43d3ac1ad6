//! # Authentication Middleware
//!
//! Bearer-token authentication for the protected API routes. The token is a
//! single shared secret from configuration; a missing or mismatched token is
//! rejected with 401 before the request reaches any handler.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use tracing::warn;

use crate::web::response_types::ApiError;
use crate::web::state::AppState;

/// Require a valid bearer token on protected endpoints.
///
/// Skips the check entirely when no token is configured (local development).
pub async fn require_bearer(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    // Disabled auth is reported once at startup, not per request.
    if !state.config.auth.enabled() {
        return Ok(next.run(request).await);
    }

    let auth_header = request
        .headers()
        .get("authorization")
        .ok_or_else(|| {
            warn!("Unauthorized access: no authorization header");
            ApiError::Unauthorized
        })?
        .to_str()
        .map_err(|_| ApiError::Unauthorized)?;

    let token = extract_bearer_token(auth_header)?;
    if token != state.config.auth.bearer_token {
        warn!("Unauthorized access: bearer token mismatch");
        return Err(ApiError::Unauthorized);
    }

    Ok(next.run(request).await)
}

/// Extract the token from an `Authorization: Bearer <token>` header value.
fn extract_bearer_token(auth_header: &str) -> Result<&str, ApiError> {
    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(ApiError::Unauthorized)?;
    if token.is_empty() {
        return Err(ApiError::Unauthorized);
    }
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc123").unwrap(), "abc123");

        assert!(extract_bearer_token("Basic abc123").is_err());
        assert!(extract_bearer_token("Bearer ").is_err());
        assert!(extract_bearer_token("abc123").is_err());
    }
}
