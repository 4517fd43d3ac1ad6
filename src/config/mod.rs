//! # Service Configuration
//!
//! Environment-driven configuration for the pipeline API. Values are read
//! from `PIPELINE_`-prefixed variables with `__` as the section separator
//! (for example `PIPELINE__HTTP__PORT`, `PIPELINE__S3__ENDPOINT_URL`),
//! deserialized into typed sections with explicit defaults.

use config::{Config, Environment};
use serde::Deserialize;

use crate::error::{PipelineError, Result};

/// Complete service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Deployment environment name (development/test/production).
    #[serde(default = "default_environment")]
    pub environment: String,

    #[serde(default)]
    pub http: HttpConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub queue: QueueConfig,

    #[serde(default)]
    pub s3: S3Config,
}

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Upper bound for multipart dataset uploads.
    #[serde(default = "default_max_upload_mb")]
    pub max_upload_mb: usize,
}

/// Bearer-token authentication settings.
///
/// An empty token disables authentication; this matches local development
/// where no secret is provisioned.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub bearer_token: String,
}

impl AuthConfig {
    pub fn enabled(&self) -> bool {
        !self.bearer_token.is_empty()
    }
}

/// Queue backend connection settings.
#[derive(Debug, Clone, Deserialize)]
pub struct QueueConfig {
    /// Broker/result-backend URL. The scheme selects the client:
    /// `redis://` for the real backend, `memory://` for the in-process one.
    #[serde(default = "default_broker_url")]
    pub broker_url: String,

    #[serde(default = "default_queue_name")]
    pub default_queue: String,
}

/// Object store connection settings.
#[derive(Debug, Clone, Deserialize)]
pub struct S3Config {
    /// Endpoint override for MinIO-style deployments; `None` uses the SDK's
    /// default resolution. `memory://` selects the in-process store.
    #[serde(default)]
    pub endpoint_url: Option<String>,

    #[serde(default = "default_region")]
    pub region: String,

    #[serde(default)]
    pub access_key_id: String,

    #[serde(default)]
    pub secret_access_key: String,

    #[serde(default = "default_bucket")]
    pub bucket: String,
}

impl ServiceConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        let raw = Config::builder()
            .add_source(
                Environment::with_prefix("PIPELINE")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()
            .map_err(|e| PipelineError::configuration(e.to_string()))?;

        let cfg: ServiceConfig = raw
            .try_deserialize()
            .map_err(|e| PipelineError::configuration(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject configurations the service cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.queue.broker_url.is_empty() {
            return Err(PipelineError::configuration("queue.broker_url must be set"));
        }
        if self.s3.bucket.is_empty() {
            return Err(PipelineError::configuration("s3.bucket must be set"));
        }
        if self.environment == "production" && !self.auth.enabled() {
            return Err(PipelineError::configuration(
                "auth.bearer_token must be set in production",
            ));
        }
        Ok(())
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.http.max_upload_mb * 1024 * 1024
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            environment: default_environment(),
            http: HttpConfig::default(),
            auth: AuthConfig::default(),
            queue: QueueConfig::default(),
            s3: S3Config::default(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            request_timeout_ms: default_request_timeout_ms(),
            max_upload_mb: default_max_upload_mb(),
        }
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            broker_url: default_broker_url(),
            default_queue: default_queue_name(),
        }
    }
}

impl Default for S3Config {
    fn default() -> Self {
        Self {
            endpoint_url: None,
            region: default_region(),
            access_key_id: String::new(),
            secret_access_key: String::new(),
            bucket: default_bucket(),
        }
    }
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout_ms() -> u64 {
    30_000
}

fn default_max_upload_mb() -> usize {
    32
}

fn default_broker_url() -> String {
    "redis://127.0.0.1:6379/0".to_string()
}

fn default_queue_name() -> String {
    "tasks".to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_bucket() -> String {
    "pipeline-artifacts".to_string()
}
