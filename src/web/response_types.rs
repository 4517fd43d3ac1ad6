//! # Web API Error Types
//!
//! Error types specific to the web API and their HTTP response conversions.
//! Leverages thiserror for structured error handling and Axum's IntoResponse
//! for HTTP conversion.

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::data::DataError;
use crate::dispatch::{DispatchError, ResultUnavailableError};
use crate::models::ValidationError;
use crate::storage::StorageError;

/// Web API errors with HTTP status code mappings.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid request: {message}")]
    BadRequest { message: String },

    #[error("Resource not found")]
    NotFound,

    #[error("Task submission failed")]
    DispatchFailed,

    #[error("Task state unavailable")]
    ResultUnavailable,

    #[error("Object storage failed")]
    StorageFailed,

    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status_code, error_code, message) = match &self {
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Authentication required".to_string(),
            ),

            ApiError::BadRequest { message } => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", message.clone())
            }

            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                "Resource not found".to_string(),
            ),

            ApiError::DispatchFailed => (
                StatusCode::SERVICE_UNAVAILABLE,
                "DISPATCH_FAILED",
                "Task queue backend unavailable".to_string(),
            ),

            ApiError::ResultUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "RESULT_UNAVAILABLE",
                "Task queue backend unavailable".to_string(),
            ),

            ApiError::StorageFailed => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "STORAGE_FAILED",
                "Object storage operation failed".to_string(),
            ),

            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "Internal server error".to_string(),
            ),
        };

        let error_response = json!({
            "error": {
                "code": error_code,
                "message": message
            }
        });

        (status_code, Json(error_response)).into_response()
    }
}

/// Malformed payloads surface as client errors with the failing field.
impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::bad_request(err.to_string())
    }
}

/// Submission failures never leak partial state; the caller sees a generic
/// server error while the underlying cause goes to the logs at the gateway.
impl From<DispatchError> for ApiError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::BackendUnreachable(_) => ApiError::DispatchFailed,
            DispatchError::PayloadSerialization(_) => ApiError::Internal,
        }
    }
}

impl From<ResultUnavailableError> for ApiError {
    fn from(_: ResultUnavailableError) -> Self {
        ApiError::ResultUnavailable
    }
}

impl From<StorageError> for ApiError {
    fn from(_: StorageError) -> Self {
        ApiError::StorageFailed
    }
}

impl From<DataError> for ApiError {
    fn from(err: DataError) -> Self {
        ApiError::bad_request(err.to_string())
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::bad_request(format!("Malformed multipart body: {err}"))
    }
}

/// Result type alias for web API operations.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_are_client_errors() {
        let err: ApiError = ValidationError::new("age", "out of range").into();
        assert!(matches!(err, ApiError::BadRequest { .. }));
    }

    #[test]
    fn test_dispatch_errors_are_server_errors() {
        let messaging = crate::messaging::MessagingError::broker_connection("down");
        let err: ApiError = DispatchError::BackendUnreachable(messaging).into();
        assert!(matches!(err, ApiError::DispatchFailed));
    }
}
