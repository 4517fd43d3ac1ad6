//! # Task Dispatch Gateway
//!
//! Coordination layer between the HTTP surface and the asynchronous queue
//! backend. The gateway submits named jobs for execution, reports their
//! current status, and fetches results once a job reaches its terminal
//! success state.
//!
//! The gateway itself is stateless: every task's status lineage lives in the
//! queue backend, which is the single source of truth. This lets multiple
//! service replicas observe consistent task state without a shared store.
//!
//! ## Components
//!
//! - [`TaskDispatchGateway`] - submit / poll_status / fetch_result operations
//! - [`Operation`] - closed set of dispatchable job variants
//! - [`TaskStatus`] - status enumeration with monotonic transition rules
//! - [`TaskId`] / [`TaskHandle`] - opaque handle issued per submission

pub mod gateway;
pub mod handle;
pub mod operation;
pub mod status;

pub use gateway::{DispatchError, ResultUnavailableError, TaskDispatchGateway};
pub use handle::{TaskHandle, TaskId};
pub use operation::Operation;
pub use status::TaskStatus;
