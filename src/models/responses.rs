//! Response bodies for the HTTP surface.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dispatch::{TaskHandle, TaskStatus};

/// Status report for an asynchronous task.
///
/// `result` is present only once the task has reached its terminal success
/// status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AsyncTaskResponse {
    pub id: String,
    pub status: TaskStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
}

impl From<TaskHandle> for AsyncTaskResponse {
    fn from(handle: TaskHandle) -> Self {
        Self {
            id: handle.id.to_string(),
            status: handle.status,
            result: handle.result,
        }
    }
}

/// Column metadata extracted from an uploaded dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileMetadataResponse {
    pub columns: Vec<String>,
}

/// Acknowledgement of a stored dataset upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub status: String,
    pub reference_data_filename: String,
}

/// Acknowledgement of a recorded feedback label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackResponse {
    pub status: String,
    pub task_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::TaskId;

    #[test]
    fn test_pending_response_omits_result() {
        let response = AsyncTaskResponse::from(TaskHandle::pending(TaskId::from("abc")));
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["id"], "abc");
        assert_eq!(value["status"], "PENDING");
        assert!(value.get("result").is_none());
    }
}
