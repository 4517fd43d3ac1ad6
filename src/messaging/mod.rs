//! # Queue Client Layer
//!
//! Contract for talking to the external asynchronous task queue (broker plus
//! worker pool) and its implementations. The broker owns all job state; this
//! layer only submits work and reads back status/result metadata.
//!
//! ## Components
//!
//! - [`QueueClient`] - submit / get_status / get_result contract
//! - [`CeleryClient`] - Redis-backed client speaking Celery wire conventions
//! - [`InMemoryQueueClient`] - in-process backend for tests and local runs
//! - [`MessagingError`] - structured transport/protocol errors

pub mod celery_client;
pub mod errors;
pub mod memory;

pub use celery_client::CeleryClient;
pub use errors::MessagingError;
pub use memory::InMemoryQueueClient;

use async_trait::async_trait;
use serde_json::Value;

use crate::dispatch::{Operation, TaskId, TaskStatus};

/// Client contract for the external queue backend.
///
/// Implementations must be internally synchronized: the handle is long-lived
/// and shared across request handlers without external locking.
#[async_trait]
pub trait QueueClient: Send + Sync {
    /// Enqueue one job for `operation` on the named queue.
    ///
    /// Ownership of `parameters` transfers to the backend; the client keeps
    /// no copy. Returns the freshly issued task id on confirmed enqueue.
    async fn submit(
        &self,
        operation: Operation,
        queue_name: &str,
        parameters: Value,
    ) -> Result<TaskId, MessagingError>;

    /// Most recent status known for `task_id`.
    ///
    /// An id the backend has never seen reports [`TaskStatus::Pending`];
    /// callers cannot distinguish "not yet started" from "never existed".
    async fn get_status(&self, task_id: &TaskId) -> Result<TaskStatus, MessagingError>;

    /// Stored result payload for `task_id`, if any has been recorded.
    async fn get_result(&self, task_id: &TaskId) -> Result<Option<Value>, MessagingError>;

    /// Current status and recorded payload, read together in one backend
    /// round trip. The payload is whatever the backend stored, regardless of
    /// status; callers decide whether it is a result worth exposing.
    async fn get_state(
        &self,
        task_id: &TaskId,
    ) -> Result<(TaskStatus, Option<Value>), MessagingError>;
}
