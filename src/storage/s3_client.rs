//! # S3 Object Store
//!
//! AWS SDK implementation of [`ObjectStore`]. Supports MinIO-style
//! deployments through an endpoint override with path-style addressing, and
//! provisions the configured bucket (with versioning enabled) lazily on the
//! first write.

use async_trait::async_trait;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{
    BucketLocationConstraint, BucketVersioningStatus, CreateBucketConfiguration,
    VersioningConfiguration,
};
use bytes::Bytes;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::config::S3Config;

use super::{ObjectStore, StorageError};

/// Object store backed by an S3-compatible service.
pub struct S3ObjectStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    region: String,
    bucket_ready: OnceCell<()>,
}

impl S3ObjectStore {
    /// Build a client from service configuration.
    ///
    /// Static credentials and the endpoint override come from the config;
    /// when no endpoint is configured the SDK's default resolution applies.
    pub async fn from_config(cfg: &S3Config) -> Self {
        let credentials = Credentials::new(
            cfg.access_key_id.clone(),
            cfg.secret_access_key.clone(),
            None,
            None,
            "pipeline-static",
        );
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(cfg.region.clone()))
            .credentials_provider(credentials)
            .load()
            .await;

        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config);
        if let Some(endpoint) = &cfg.endpoint_url {
            // MinIO and friends require path-style bucket addressing.
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        Self {
            client: aws_sdk_s3::Client::from_conf(builder.build()),
            bucket: cfg.bucket.clone(),
            region: cfg.region.clone(),
            bucket_ready: OnceCell::new(),
        }
    }

    /// Create the configured bucket if it does not exist yet and enable
    /// versioning on it. Runs at most once per client instance.
    async fn ensure_bucket(&self) -> Result<(), StorageError> {
        self.bucket_ready
            .get_or_try_init(|| async {
                let existing = self.client.list_buckets().send().await.map_err(|e| {
                    StorageError::backend("list_buckets", e.to_string())
                })?;

                let already_exists = existing
                    .buckets()
                    .iter()
                    .any(|b| b.name() == Some(self.bucket.as_str()));

                if already_exists {
                    debug!(bucket = %self.bucket, "Bucket already exists");
                    return Ok(());
                }

                let mut create = self.client.create_bucket().bucket(&self.bucket);
                if self.region != "us-east-1" {
                    create = create.create_bucket_configuration(
                        CreateBucketConfiguration::builder()
                            .location_constraint(BucketLocationConstraint::from(
                                self.region.as_str(),
                            ))
                            .build(),
                    );
                }
                create.send().await.map_err(|e| {
                    StorageError::bucket_provisioning(&self.bucket, e.to_string())
                })?;
                info!(bucket = %self.bucket, "Created bucket");

                self.client
                    .put_bucket_versioning()
                    .bucket(&self.bucket)
                    .versioning_configuration(
                        VersioningConfiguration::builder()
                            .status(BucketVersioningStatus::Enabled)
                            .build(),
                    )
                    .send()
                    .await
                    .map_err(|e| {
                        StorageError::bucket_provisioning(&self.bucket, e.to_string())
                    })?;
                info!(bucket = %self.bucket, "Enabled versioning");

                Ok(())
            })
            .await
            .map(|_| ())
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> Result<(), StorageError> {
        self.ensure_bucket().await?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| StorageError::backend("put_object", e.to_string()))?;

        debug!(bucket = %self.bucket, key, "Stored object");
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Bytes>, StorageError> {
        match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(resp) => {
                let data = resp
                    .body
                    .collect()
                    .await
                    .map_err(|e| StorageError::backend("get_object", e.to_string()))?;
                Ok(Some(data.into_bytes()))
            }
            Err(err) => {
                let service_err = err.into_service_error();
                if service_err.is_no_such_key() {
                    Ok(None)
                } else {
                    Err(StorageError::backend("get_object", service_err.to_string()))
                }
            }
        }
    }

    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(err) => {
                let service_err = err.into_service_error();
                if service_err.is_not_found() {
                    Ok(false)
                } else {
                    Err(StorageError::backend("head_object", service_err.to_string()))
                }
            }
        }
    }
}
