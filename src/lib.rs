#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Pipeline API
//!
//! HTTP gateway service for an ML pipeline. The service accepts dataset
//! uploads and prediction requests, hands long-running work (model training,
//! inference) off to an external asynchronous task queue, and persists
//! intermediate artifacts to object storage.
//!
//! ## Architecture
//!
//! The core of the crate is the **task dispatch gateway**: a stateless
//! coordination layer that submits jobs to the queue backend, polls their
//! status, and fetches results once a job reaches its terminal success state.
//! All job state lives in the queue backend; two service replicas observe
//! consistent task status without any shared store of their own.
//!
//! ## Module Organization
//!
//! - [`dispatch`] - Task dispatch gateway, operations, statuses, handles
//! - [`messaging`] - Queue client contract and backend implementations
//! - [`storage`] - Object store contract and backend implementations
//! - [`models`] - Request/response schemas and input validation
//! - [`data`] - Uploaded dataset format detection and column metadata
//! - [`web`] - Axum HTTP surface: routes, handlers, middleware, state
//! - [`config`] - Environment-driven service configuration
//! - [`error`] - Crate-level error taxonomy
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use pipeline_api::dispatch::TaskDispatchGateway;
//! use pipeline_api::messaging::InMemoryQueueClient;
//!
//! # async fn example() {
//! let queue = Arc::new(InMemoryQueueClient::new());
//! let gateway = TaskDispatchGateway::new(queue);
//! # let _ = gateway;
//! # }
//! ```

pub mod config;
pub mod data;
pub mod dispatch;
pub mod error;
pub mod logging;
pub mod messaging;
pub mod models;
pub mod storage;
pub mod web;

pub use error::{PipelineError, Result};
