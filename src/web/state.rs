//! # Web API Application State
//!
//! Shared state for the web API. All backend handles are built once at
//! startup and injected here; request handlers never construct clients of
//! their own and no module-level singletons exist.

use std::sync::Arc;

use crate::config::ServiceConfig;
use crate::dispatch::TaskDispatchGateway;
use crate::messaging::QueueClient;
use crate::storage::ObjectStore;

/// Shared application state for the web API.
///
/// Cloning is cheap; every field is behind an `Arc`. The queue-client and
/// object-store handles are long-lived and internally synchronized, so
/// handlers use them concurrently without extra locking.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServiceConfig>,
    pub gateway: TaskDispatchGateway,
    pub object_store: Arc<dyn ObjectStore>,
}

impl AppState {
    pub fn new(
        config: ServiceConfig,
        queue: Arc<dyn QueueClient>,
        object_store: Arc<dyn ObjectStore>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            gateway: TaskDispatchGateway::new(queue),
            object_store,
        }
    }
}
