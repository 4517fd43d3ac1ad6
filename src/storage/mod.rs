//! # Object Store Layer
//!
//! Contract for the external blob storage backend that holds uploaded
//! datasets and model artifacts, plus its implementations. The store is
//! reached through a long-lived, internally synchronized client handle shared
//! across requests.
//!
//! ## Components
//!
//! - [`ObjectStore`] - put / get / exists contract
//! - [`S3ObjectStore`] - AWS SDK client with MinIO-style endpoint override
//! - [`InMemoryObjectStore`] - in-process store for tests
//! - [`StorageError`] - structured backend errors

pub mod memory;
pub mod s3_client;

pub use memory::InMemoryObjectStore;
pub use s3_client::S3ObjectStore;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Object store backend errors.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Object store backend error: {operation}: {message}")]
    Backend { operation: String, message: String },

    #[error("Bucket provisioning failed: {bucket}: {message}")]
    BucketProvisioning { bucket: String, message: String },
}

impl StorageError {
    pub fn backend(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Backend {
            operation: operation.into(),
            message: message.into(),
        }
    }

    pub fn bucket_provisioning(bucket: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BucketProvisioning {
            bucket: bucket.into(),
            message: message.into(),
        }
    }
}

/// Client contract for the blob storage backend.
///
/// The configured bucket is created automatically, with versioning enabled,
/// before the first write that needs it.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `bytes` under `key`, creating the bucket on first use.
    async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> Result<(), StorageError>;

    /// Read the object at `key`. `None` if no such object exists.
    async fn get(&self, key: &str) -> Result<Option<Bytes>, StorageError>;

    /// Whether an object exists at `key`.
    async fn exists(&self, key: &str) -> Result<bool, StorageError>;
}
