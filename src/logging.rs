//! # Structured Logging
//!
//! Tracing subscriber initialization for the service. Initialization is
//! idempotent so tests and embedded usage can call it freely.

use std::sync::OnceLock;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging with an environment-driven filter.
///
/// `RUST_LOG` controls verbosity; the default keeps the crate at `info` and
/// quiets noisy HTTP internals. Production gets JSON lines for log
/// aggregation, everything else a human-readable format.
pub fn init(environment: &str) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("info,pipeline_api=info,tower_http=warn"));

        let registry = tracing_subscriber::registry().with(filter);

        // A subscriber may already be installed (tests, embedding); that is
        // not an error, hence try_init.
        if environment == "production" {
            let _ = registry
                .with(fmt::layer().with_target(true).with_ansi(false).json())
                .try_init();
        } else {
            let _ = registry.with(fmt::layer().with_target(true)).try_init();
        }
    });
}
