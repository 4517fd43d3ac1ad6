//! # Task Handles
//!
//! Opaque identifiers and handles issued per submission. A task id, once
//! issued, always resolves to exactly one status lineage; ids are never
//! reused (UUID v4 per submission).

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::status::TaskStatus;

/// Opaque identifier of one asynchronous job submission.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Generate a fresh, never-reused identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Handle returned by a successful submission.
///
/// The result payload is present only once the task has reached its terminal
/// success status. The handle is a snapshot; the authoritative state lives in
/// the queue backend and is re-read on every poll.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskHandle {
    pub id: TaskId,
    pub status: TaskStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
}

impl TaskHandle {
    /// Handle for a freshly enqueued task.
    pub fn pending(id: TaskId) -> Self {
        Self {
            id,
            status: TaskStatus::Pending,
            result: None,
        }
    }
}
