//! # Task Status
//!
//! Status enumeration for dispatched tasks and the monotonic transition rules
//! the queue backend guarantees for a single task's lineage.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Current status of a dispatched task as reported by the queue backend.
///
/// `Pending` is the initial status. `Success` and `Failure` are terminal:
/// no further transitions occur out of them. A task may loop through
/// `Started -> Retry -> Started` any number of times before terminating.
///
/// The queue backend cannot distinguish a task that has not started yet from
/// a task id it has never seen; both report `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TaskStatus {
    Pending,
    Started,
    Retry,
    Failure,
    Success,
}

impl TaskStatus {
    /// Whether this status is terminal (no further transitions occur).
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Success | TaskStatus::Failure)
    }

    /// Whether a task in this status may move to `next`.
    ///
    /// Lineage: `PENDING -> STARTED -> {SUCCESS, FAILURE}`, with
    /// `STARTED -> RETRY -> STARTED` loops permitted before a terminal state.
    pub fn can_transition_to(&self, next: TaskStatus) -> bool {
        matches!(
            (self, next),
            (TaskStatus::Pending, TaskStatus::Started)
                | (TaskStatus::Started, TaskStatus::Retry)
                | (TaskStatus::Started, TaskStatus::Success)
                | (TaskStatus::Started, TaskStatus::Failure)
                | (TaskStatus::Retry, TaskStatus::Started)
        )
    }

    /// Wire representation used by the queue backend's result metadata.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "PENDING",
            TaskStatus::Started => "STARTED",
            TaskStatus::Retry => "RETRY",
            TaskStatus::Failure => "FAILURE",
            TaskStatus::Success => "SUCCESS",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when the backend reports a status string outside the
/// known enumeration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized task status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for TaskStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(TaskStatus::Pending),
            "STARTED" => Ok(TaskStatus::Started),
            "RETRY" => Ok(TaskStatus::Retry),
            "FAILURE" => Ok(TaskStatus::Failure),
            "SUCCESS" => Ok(TaskStatus::Success),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}
