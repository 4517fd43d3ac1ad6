//! # Request/Response Schemas
//!
//! Typed payloads for the HTTP surface and their validation. Categorical
//! fields are closed enums serialized with the reference dataset's hyphenated
//! spellings, so a typo in a category value fails deserialization rather than
//! reaching the workers.

pub mod features;
pub mod requests;
pub mod responses;

pub use features::{FeedbackRecord, UserFeatureRecord};
pub use requests::TrainRequest;
pub use responses::{AsyncTaskResponse, FeedbackResponse, FileMetadataResponse, UploadResponse};

use thiserror::Error;

/// Malformed input payload; surfaced to HTTP callers as a client error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Validation error: {field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}
