//! # Celery Queue Client
//!
//! Redis-backed [`QueueClient`] speaking the Celery wire conventions the
//! worker pool consumes. Submission pushes a protocol-v2 message (base64 JSON
//! body plus task headers and delivery properties) onto the queue's Redis
//! list; status and results are read from the `celery-task-meta-{id}` keys
//! the workers write into the result backend.
//!
//! This is a client for an external broker, not a broker: the connection is a
//! long-lived multiplexed handle shared across requests, and no job state is
//! kept on this side.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::dispatch::{Operation, TaskId, TaskStatus};

use super::errors::MessagingError;
use super::QueueClient;

/// Key prefix under which workers store task result metadata.
const RESULT_META_PREFIX: &str = "celery-task-meta-";

/// Result metadata record written by workers.
#[derive(Debug, Deserialize)]
struct TaskMeta {
    status: String,
    #[serde(default)]
    result: Value,
}

/// Redis-backed queue client.
#[derive(Clone)]
pub struct CeleryClient {
    conn: MultiplexedConnection,
}

impl CeleryClient {
    /// Connect to the broker/result backend at the given Redis URL.
    ///
    /// Fails fast if the connection cannot be established; the service should
    /// not come up pointing at an unreachable broker.
    pub async fn connect(url: &str) -> Result<Self, MessagingError> {
        let client = redis::Client::open(url).map_err(|e| {
            MessagingError::broker_connection(format!("invalid broker URL: {e}"))
        })?;
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| {
                MessagingError::broker_connection(format!("failed to connect to broker: {e}"))
            })?;

        info!("Connected to queue backend");
        Ok(Self { conn })
    }

    /// Build one protocol-v2 message for `operation` routed to `queue_name`.
    ///
    /// Parameters travel as keyword arguments; positional args stay empty,
    /// matching how the workers register their task signatures.
    fn protocol_message(
        task_id: &TaskId,
        operation: Operation,
        queue_name: &str,
        parameters: &Value,
    ) -> Result<String, MessagingError> {
        let body = json!([
            [],
            parameters,
            {"callbacks": null, "errbacks": null, "chain": null, "chord": null}
        ]);
        let encoded_body = BASE64.encode(serde_json::to_vec(&body)?);

        let message = json!({
            "body": encoded_body,
            "content-encoding": "utf-8",
            "content-type": "application/json",
            "headers": {
                "lang": "py",
                "task": operation.task_name(),
                "id": task_id.as_str(),
                "root_id": task_id.as_str(),
                "parent_id": null,
                "group": null,
                "retries": 0,
                "eta": null,
                "expires": null,
                "timelimit": [null, null],
            },
            "properties": {
                "correlation_id": task_id.as_str(),
                "reply_to": "",
                "delivery_mode": 2,
                "delivery_info": {"exchange": "", "routing_key": queue_name},
                "priority": 0,
                "body_encoding": "base64",
                "delivery_tag": Uuid::new_v4().to_string(),
            },
        });

        Ok(serde_json::to_string(&message)?)
    }

    async fn read_meta(&self, task_id: &TaskId) -> Result<Option<TaskMeta>, MessagingError> {
        let key = format!("{RESULT_META_PREFIX}{task_id}");
        let mut conn = self.conn.clone();

        let raw: Option<String> = conn.get(&key).await.map_err(|e| {
            MessagingError::result_backend("get", format!("failed to read {key}: {e}"))
        })?;

        match raw {
            None => Ok(None),
            Some(payload) => {
                let meta: TaskMeta = serde_json::from_str(&payload).map_err(|e| {
                    MessagingError::MessageDeserialization {
                        message: format!("malformed result metadata for {task_id}: {e}"),
                    }
                })?;
                Ok(Some(meta))
            }
        }
    }
}

#[async_trait]
impl QueueClient for CeleryClient {
    async fn submit(
        &self,
        operation: Operation,
        queue_name: &str,
        parameters: Value,
    ) -> Result<TaskId, MessagingError> {
        let task_id = TaskId::generate();
        let message = Self::protocol_message(&task_id, operation, queue_name, &parameters)?;

        let mut conn = self.conn.clone();
        let _queued: i64 = conn.lpush(queue_name, message).await.map_err(|e| {
            MessagingError::queue_operation(queue_name, "lpush", e.to_string())
        })?;

        debug!(task_id = %task_id, queue = queue_name, "Message pushed to broker");
        Ok(task_id)
    }

    async fn get_status(&self, task_id: &TaskId) -> Result<TaskStatus, MessagingError> {
        Ok(self.get_state(task_id).await?.0)
    }

    async fn get_result(&self, task_id: &TaskId) -> Result<Option<Value>, MessagingError> {
        Ok(self.get_state(task_id).await?.1)
    }

    async fn get_state(
        &self,
        task_id: &TaskId,
    ) -> Result<(TaskStatus, Option<Value>), MessagingError> {
        match self.read_meta(task_id).await? {
            // No metadata: not yet started, or never existed. The backend
            // itself cannot tell; both report Pending.
            None => Ok((TaskStatus::Pending, None)),
            Some(meta) => {
                let status = meta.status.parse::<TaskStatus>().map_err(|e| {
                    warn!(task_id = %task_id, status = %meta.status, "Backend reported unknown status");
                    MessagingError::protocol(e.to_string())
                })?;
                Ok((status, Some(meta.result)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_body(message: &Value) -> Value {
        let encoded = message["body"].as_str().unwrap();
        let bytes = BASE64.decode(encoded).unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_protocol_message_carries_task_headers() {
        let task_id = TaskId::from("11111111-2222-3333-4444-555555555555");
        let raw = CeleryClient::protocol_message(
            &task_id,
            Operation::TrainModel,
            "tasks",
            &json!({"optimize_hyperparams": true}),
        )
        .unwrap();
        let message: Value = serde_json::from_str(&raw).unwrap();

        assert_eq!(message["headers"]["task"], "pipeline.tasks.train_model");
        assert_eq!(message["headers"]["id"], task_id.as_str());
        assert_eq!(message["properties"]["delivery_info"]["routing_key"], "tasks");
        assert_eq!(message["properties"]["body_encoding"], "base64");
        assert_eq!(message["content-type"], "application/json");
    }

    #[test]
    fn test_parameters_travel_as_kwargs() {
        let task_id = TaskId::generate();
        let params = json!({"optimize_hyperparams": false, "include_user_data": true});
        let raw =
            CeleryClient::protocol_message(&task_id, Operation::TrainModel, "tasks", &params)
                .unwrap();
        let message: Value = serde_json::from_str(&raw).unwrap();

        let body = decode_body(&message);
        assert_eq!(body[0], json!([]), "positional args stay empty");
        assert_eq!(body[1], params);
    }

    #[test]
    fn test_result_meta_parses_backend_record() {
        let meta: TaskMeta = serde_json::from_str(
            r#"{"status": "SUCCESS", "result": {"accuracy": 0.91},
                "traceback": null, "children": [], "task_id": "abc"}"#,
        )
        .unwrap();

        assert_eq!(meta.status, "SUCCESS");
        assert_eq!(meta.result, json!({"accuracy": 0.91}));
    }
}
