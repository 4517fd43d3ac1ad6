//! Pipeline API server entrypoint.
//!
//! Loads configuration from the environment, wires the backend clients once,
//! and serves the Axum application until interrupted.

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use pipeline_api::config::ServiceConfig;
use pipeline_api::messaging::{CeleryClient, InMemoryQueueClient, QueueClient};
use pipeline_api::storage::{InMemoryObjectStore, ObjectStore, S3ObjectStore};
use pipeline_api::web::{self, state::AppState};
use pipeline_api::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServiceConfig::from_env().context("failed to load configuration")?;
    logging::init(&config.environment);

    info!(
        environment = %config.environment,
        port = config.http.port,
        "Starting pipeline API"
    );
    if !config.auth.enabled() {
        warn!("No bearer token configured; API authentication is disabled");
    }

    let queue = build_queue_client(&config).await?;
    let object_store = build_object_store(&config).await;

    let bind = format!("{}:{}", config.http.bind_address, config.http.port);
    let app = web::create_app(AppState::new(config, queue, object_store));

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("failed to bind {bind}"))?;
    info!(address = %bind, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Shut down cleanly");
    Ok(())
}

/// Select the queue client from the broker URL scheme.
async fn build_queue_client(config: &ServiceConfig) -> anyhow::Result<Arc<dyn QueueClient>> {
    if config.queue.broker_url.starts_with("memory://") {
        warn!("Using in-memory queue backend; submitted jobs will never run");
        return Ok(Arc::new(InMemoryQueueClient::new()));
    }

    let client = CeleryClient::connect(&config.queue.broker_url)
        .await
        .context("failed to connect to queue backend")?;
    Ok(Arc::new(client))
}

/// Select the object store from the endpoint configuration.
async fn build_object_store(config: &ServiceConfig) -> Arc<dyn ObjectStore> {
    match config.s3.endpoint_url.as_deref() {
        Some("memory://") => {
            warn!("Using in-memory object store; uploads will not survive restarts");
            Arc::new(InMemoryObjectStore::new())
        }
        _ => Arc::new(S3ObjectStore::from_config(&config.s3).await),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received");
}
