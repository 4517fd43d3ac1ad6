//! # Crate Error Types
//!
//! Top-level error type for service wiring. Request-path errors
//! (`MessagingError`, `StorageError`, the dispatch errors) convert directly
//! into web-layer [`ApiError`](crate::web::response_types::ApiError)
//! responses and never bubble up here; what remains at the crate level is
//! what the service can fail with before it starts serving.

use thiserror::Error;

/// Errors surfaced while wiring the pipeline API service.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Invalid or missing service configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl PipelineError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error_names_the_problem() {
        let err = PipelineError::configuration("queue.broker_url must be set");
        assert_eq!(
            err.to_string(),
            "Configuration error: queue.broker_url must be set"
        );
    }
}
