//! # In-Memory Queue Client
//!
//! In-process [`QueueClient`] for tests and local development. Jobs are never
//! executed; tests drive status transitions explicitly through the same
//! monotonic state machine the real backend guarantees.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde_json::Value;
use tracing::debug;

use crate::dispatch::{Operation, TaskId, TaskStatus};

use super::errors::MessagingError;
use super::QueueClient;

/// One enqueued job and its current backend-side state.
#[derive(Debug, Clone)]
pub struct QueuedTask {
    pub operation: Operation,
    pub queue_name: String,
    pub parameters: Value,
    pub status: TaskStatus,
    pub result: Option<Value>,
    pub enqueued_at: DateTime<Utc>,
}

/// In-memory queue backend double.
///
/// `set_unreachable(true)` makes every call fail with a connection error, for
/// exercising the no-handle-on-failure and result-unavailable paths.
#[derive(Default)]
pub struct InMemoryQueueClient {
    tasks: DashMap<TaskId, QueuedTask>,
    unreachable: AtomicBool,
}

impl InMemoryQueueClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate the broker dropping off the network.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    /// Snapshot of one enqueued task, if the id is known.
    pub fn task(&self, task_id: &TaskId) -> Option<QueuedTask> {
        self.tasks.get(task_id).map(|t| t.clone())
    }

    /// Number of jobs enqueued on `queue_name` so far.
    pub fn enqueued_on(&self, queue_name: &str) -> usize {
        self.tasks
            .iter()
            .filter(|t| t.queue_name == queue_name)
            .count()
    }

    /// Transition a task to `Started`.
    pub fn start(&self, task_id: &TaskId) -> Result<(), MessagingError> {
        self.transition(task_id, TaskStatus::Started, None)
    }

    /// Transition a started task through one `Retry -> Started` loop.
    pub fn retry(&self, task_id: &TaskId) -> Result<(), MessagingError> {
        self.transition(task_id, TaskStatus::Retry, None)?;
        self.transition(task_id, TaskStatus::Started, None)
    }

    /// Terminate a task successfully, recording its result payload.
    pub fn complete(&self, task_id: &TaskId, result: Value) -> Result<(), MessagingError> {
        self.transition(task_id, TaskStatus::Success, Some(result))
    }

    /// Terminate a task as failed, recording the failure payload.
    pub fn fail(&self, task_id: &TaskId, error: Value) -> Result<(), MessagingError> {
        self.transition(task_id, TaskStatus::Failure, Some(error))
    }

    fn transition(
        &self,
        task_id: &TaskId,
        next: TaskStatus,
        result: Option<Value>,
    ) -> Result<(), MessagingError> {
        let Some(mut task) = self.tasks.get_mut(task_id) else {
            return Err(MessagingError::protocol(format!(
                "transition on unknown task id {task_id}"
            )));
        };
        if !task.status.can_transition_to(next) {
            return Err(MessagingError::protocol(format!(
                "illegal transition {} -> {} for task {task_id}",
                task.status, next
            )));
        }
        task.status = next;
        if result.is_some() {
            task.result = result;
        }
        Ok(())
    }

    fn check_reachable(&self, context: &str) -> Result<(), MessagingError> {
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(MessagingError::broker_connection(format!(
                "broker unreachable during {context}"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl QueueClient for InMemoryQueueClient {
    async fn submit(
        &self,
        operation: Operation,
        queue_name: &str,
        parameters: Value,
    ) -> Result<TaskId, MessagingError> {
        self.check_reachable("submit")?;

        let task_id = TaskId::generate();
        self.tasks.insert(
            task_id.clone(),
            QueuedTask {
                operation,
                queue_name: queue_name.to_string(),
                parameters,
                status: TaskStatus::Pending,
                result: None,
                enqueued_at: Utc::now(),
            },
        );

        debug!(task_id = %task_id, queue = queue_name, "Task recorded in memory backend");
        Ok(task_id)
    }

    async fn get_status(&self, task_id: &TaskId) -> Result<TaskStatus, MessagingError> {
        self.check_reachable("get_status")?;

        // Unknown ids report Pending, mirroring the real backend's
        // pending-or-unknown ambiguity.
        Ok(self
            .tasks
            .get(task_id)
            .map(|t| t.status)
            .unwrap_or(TaskStatus::Pending))
    }

    async fn get_result(&self, task_id: &TaskId) -> Result<Option<Value>, MessagingError> {
        self.check_reachable("get_result")?;
        Ok(self.tasks.get(task_id).and_then(|t| t.result.clone()))
    }

    async fn get_state(
        &self,
        task_id: &TaskId,
    ) -> Result<(TaskStatus, Option<Value>), MessagingError> {
        self.check_reachable("get_state")?;
        Ok(self
            .tasks
            .get(task_id)
            .map(|t| (t.status, t.result.clone()))
            .unwrap_or((TaskStatus::Pending, None)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_submit_records_queue_and_parameters() {
        let queue = InMemoryQueueClient::new();
        let id = queue
            .submit(Operation::Predict, "tasks", json!({"age": 39.0}))
            .await
            .unwrap();

        let task = queue.task(&id).unwrap();
        assert_eq!(task.operation, Operation::Predict);
        assert_eq!(task.queue_name, "tasks");
        assert_eq!(task.parameters, json!({"age": 39.0}));
        assert_eq!(queue.enqueued_on("tasks"), 1);
    }

    #[tokio::test]
    async fn test_retry_loop_preserves_lineage() {
        let queue = InMemoryQueueClient::new();
        let id = queue
            .submit(Operation::TrainModel, "tasks", json!({}))
            .await
            .unwrap();

        queue.start(&id).unwrap();
        queue.retry(&id).unwrap();
        queue.retry(&id).unwrap();
        assert_eq!(queue.get_status(&id).await.unwrap(), TaskStatus::Started);

        queue.complete(&id, json!({"accuracy": 0.91})).unwrap();
        assert_eq!(queue.get_status(&id).await.unwrap(), TaskStatus::Success);
    }

    #[tokio::test]
    async fn test_terminal_states_reject_transitions() {
        let queue = InMemoryQueueClient::new();
        let id = queue
            .submit(Operation::TrainModel, "tasks", json!({}))
            .await
            .unwrap();

        queue.start(&id).unwrap();
        queue.complete(&id, json!({})).unwrap();

        let err = queue.start(&id).unwrap_err();
        assert!(err.to_string().contains("illegal transition"));
    }

    #[tokio::test]
    async fn test_transition_on_unknown_id_is_an_error() {
        let queue = InMemoryQueueClient::new();
        assert!(queue.start(&TaskId::from("never-submitted")).is_err());
    }

    #[tokio::test]
    async fn test_unreachable_backend_fails_every_call() {
        let queue = InMemoryQueueClient::new();
        queue.set_unreachable(true);

        assert!(queue
            .submit(Operation::Predict, "tasks", json!({}))
            .await
            .is_err());
        assert!(queue.get_status(&TaskId::from("any")).await.is_err());
        assert!(queue.get_result(&TaskId::from("any")).await.is_err());
        assert!(queue.get_state(&TaskId::from("any")).await.is_err());
    }
}
