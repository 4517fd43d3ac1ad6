//! # Dispatch Gateway Operations
//!
//! The submit / poll / fetch-result protocol between the HTTP layer and the
//! queue backend. The gateway performs exactly one non-blocking backend call
//! per operation and never retries; retry policy belongs to the backend and
//! its workers.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::messaging::{MessagingError, QueueClient};

use super::handle::{TaskHandle, TaskId};
use super::operation::Operation;
use super::status::TaskStatus;

/// Submission failed; no job was enqueued and no handle was issued.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("queue backend unreachable at submit time: {0}")]
    BackendUnreachable(#[source] MessagingError),

    #[error("submission payload could not be serialized: {0}")]
    PayloadSerialization(#[from] serde_json::Error),
}

/// The queue backend could not be reached while reading task state.
///
/// A non-terminal task is not an error: `fetch_result` reports it as an
/// absent result, and `poll_status` simply returns the current status.
#[derive(Debug, Error)]
#[error("queue backend unreachable while reading task state: {0}")]
pub struct ResultUnavailableError(#[source] pub MessagingError);

/// Stateless coordination layer over a shared queue-client handle.
///
/// The client handle is injected at construction and reused across requests;
/// it is internally synchronized, so the gateway holds no locking of its own
/// and no mutable state.
#[derive(Clone)]
pub struct TaskDispatchGateway {
    queue: Arc<dyn QueueClient>,
}

impl TaskDispatchGateway {
    pub fn new(queue: Arc<dyn QueueClient>) -> Self {
        Self { queue }
    }

    /// Submit `operation` with `parameters` to the named worker-pool queue.
    ///
    /// Fire-and-forget: returns as soon as the backend confirms the enqueue,
    /// with a handle whose status is `Pending` (or later, if a worker picked
    /// the job up already). Repeated identical submissions are not
    /// deduplicated; each call enqueues exactly one job with a fresh id.
    pub async fn submit(
        &self,
        operation: Operation,
        queue_name: &str,
        parameters: Value,
    ) -> Result<TaskHandle, DispatchError> {
        debug!(
            operation = %operation,
            queue = queue_name,
            "Submitting task to queue backend"
        );

        let task_id = self
            .queue
            .submit(operation, queue_name, parameters)
            .await
            .map_err(|e| {
                error!(operation = %operation, error = %e, "Task submission failed");
                DispatchError::BackendUnreachable(e)
            })?;

        info!(task_id = %task_id, operation = %operation, queue = queue_name, "Task enqueued");
        Ok(TaskHandle::pending(task_id))
    }

    /// Report the most recent status the queue backend knows for `task_id`.
    ///
    /// Non-blocking. An unknown id reports `Pending`: the backend itself
    /// cannot distinguish "not yet started" from "never existed", and this
    /// gateway deliberately preserves that ambiguity.
    pub async fn poll_status(&self, task_id: &TaskId) -> Result<TaskStatus, ResultUnavailableError> {
        let status = self.queue.get_status(task_id).await.map_err(|e| {
            error!(task_id = %task_id, error = %e, "Status poll failed");
            ResultUnavailableError(e)
        })?;

        debug!(task_id = %task_id, status = %status, "Polled task status");
        Ok(status)
    }

    /// Fetch the stored result for `task_id`, if the task has succeeded.
    ///
    /// Returns `None` for any task whose status is not the terminal success
    /// status; it never errors on a merely non-terminal handle. Status and
    /// payload are read in one backend round trip.
    pub async fn fetch_result(
        &self,
        task_id: &TaskId,
    ) -> Result<Option<Value>, ResultUnavailableError> {
        Ok(self.check(task_id).await?.result)
    }

    /// Snapshot status and result for `task_id` in one backend round trip.
    ///
    /// The returned handle carries the result only when the task has reached
    /// its terminal success status; a failure payload stays in the backend.
    pub async fn check(&self, task_id: &TaskId) -> Result<TaskHandle, ResultUnavailableError> {
        let (status, result) = self.queue.get_state(task_id).await.map_err(|e| {
            error!(task_id = %task_id, error = %e, "Task state read failed");
            ResultUnavailableError(e)
        })?;

        debug!(task_id = %task_id, status = %status, "Read task state");
        Ok(TaskHandle {
            id: task_id.clone(),
            status,
            result: if status == TaskStatus::Success {
                result
            } else {
                None
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messaging::InMemoryQueueClient;
    use serde_json::json;

    fn gateway_with_backend() -> (TaskDispatchGateway, Arc<InMemoryQueueClient>) {
        let queue = Arc::new(InMemoryQueueClient::new());
        (TaskDispatchGateway::new(queue.clone()), queue)
    }

    #[tokio::test]
    async fn test_submit_returns_non_terminal_handle() {
        let (gateway, _queue) = gateway_with_backend();
        let handle = gateway
            .submit(Operation::TrainModel, "tasks", json!({"optimize": true}))
            .await
            .unwrap();

        assert!(!handle.status.is_terminal());
        assert!(handle.result.is_none());
    }

    #[tokio::test]
    async fn test_poll_status_is_idempotent() {
        let (gateway, _queue) = gateway_with_backend();
        let handle = gateway
            .submit(Operation::Predict, "tasks", json!({}))
            .await
            .unwrap();

        let first = gateway.poll_status(&handle.id).await.unwrap();
        let second = gateway.poll_status(&handle.id).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_unknown_task_id_reports_pending() {
        let (gateway, _queue) = gateway_with_backend();
        let status = gateway
            .poll_status(&TaskId::from("nonexistent-id"))
            .await
            .unwrap();
        assert_eq!(status, TaskStatus::Pending);
    }

    #[tokio::test]
    async fn test_fetch_result_absent_before_success() {
        let (gateway, queue) = gateway_with_backend();
        let handle = gateway
            .submit(Operation::TrainModel, "tasks", json!({}))
            .await
            .unwrap();

        assert_eq!(gateway.fetch_result(&handle.id).await.unwrap(), None);

        queue.start(&handle.id).unwrap();
        assert_eq!(gateway.fetch_result(&handle.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_success_result_round_trip() {
        let (gateway, queue) = gateway_with_backend();
        let handle = gateway
            .submit(Operation::TrainModel, "tasks", json!({"optimize": true}))
            .await
            .unwrap();
        assert_eq!(
            gateway.poll_status(&handle.id).await.unwrap(),
            TaskStatus::Pending
        );

        queue.start(&handle.id).unwrap();
        queue.complete(&handle.id, json!({"accuracy": 0.91})).unwrap();

        assert_eq!(
            gateway.poll_status(&handle.id).await.unwrap(),
            TaskStatus::Success
        );
        assert_eq!(
            gateway.fetch_result(&handle.id).await.unwrap(),
            Some(json!({"accuracy": 0.91}))
        );
    }

    #[tokio::test]
    async fn test_failed_task_has_absent_result() {
        let (gateway, queue) = gateway_with_backend();
        let handle = gateway
            .submit(Operation::Predict, "tasks", json!({}))
            .await
            .unwrap();

        queue.start(&handle.id).unwrap();
        queue.fail(&handle.id, json!({"error": "worker crashed"})).unwrap();

        assert_eq!(
            gateway.poll_status(&handle.id).await.unwrap(),
            TaskStatus::Failure
        );
        assert_eq!(gateway.fetch_result(&handle.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_check_snapshots_status_and_gates_result() {
        let (gateway, queue) = gateway_with_backend();
        let handle = gateway
            .submit(Operation::TrainModel, "tasks", json!({}))
            .await
            .unwrap();

        let snapshot = gateway.check(&handle.id).await.unwrap();
        assert_eq!(snapshot.status, TaskStatus::Pending);
        assert!(snapshot.result.is_none());

        queue.start(&handle.id).unwrap();
        queue.fail(&handle.id, json!({"error": "oom"})).unwrap();
        let snapshot = gateway.check(&handle.id).await.unwrap();
        assert_eq!(snapshot.status, TaskStatus::Failure);
        // Failure payloads stay in the backend
        assert!(snapshot.result.is_none());
    }

    #[tokio::test]
    async fn test_check_carries_result_on_success() {
        let (gateway, queue) = gateway_with_backend();
        let handle = gateway
            .submit(Operation::Predict, "tasks", json!({}))
            .await
            .unwrap();

        queue.start(&handle.id).unwrap();
        queue.complete(&handle.id, json!({"income": ">50K"})).unwrap();

        let snapshot = gateway.check(&handle.id).await.unwrap();
        assert_eq!(snapshot.id, handle.id);
        assert_eq!(snapshot.status, TaskStatus::Success);
        assert_eq!(snapshot.result, Some(json!({"income": ">50K"})));
    }

    #[tokio::test]
    async fn test_unreachable_backend_yields_dispatch_error() {
        let (gateway, queue) = gateway_with_backend();
        queue.set_unreachable(true);

        let err = gateway
            .submit(Operation::TrainModel, "tasks", json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::BackendUnreachable(_)));
    }

    #[tokio::test]
    async fn test_unreachable_backend_yields_result_unavailable() {
        let (gateway, queue) = gateway_with_backend();
        let handle = gateway
            .submit(Operation::Predict, "tasks", json!({}))
            .await
            .unwrap();

        queue.set_unreachable(true);
        assert!(gateway.poll_status(&handle.id).await.is_err());
        assert!(gateway.fetch_result(&handle.id).await.is_err());
    }

    #[tokio::test]
    async fn test_identical_submissions_get_distinct_handles() {
        let (gateway, _queue) = gateway_with_backend();
        let params = json!({"optimize": true});

        let (first, second) = tokio::join!(
            gateway.submit(Operation::TrainModel, "tasks", params.clone()),
            gateway.submit(Operation::TrainModel, "tasks", params.clone()),
        );
        let (first, second) = (first.unwrap(), second.unwrap());

        assert_ne!(first.id, second.id);
        assert_eq!(
            gateway.poll_status(&first.id).await.unwrap(),
            TaskStatus::Pending
        );
        assert_eq!(
            gateway.poll_status(&second.id).await.unwrap(),
            TaskStatus::Pending
        );
    }
}
