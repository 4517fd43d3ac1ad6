//! # In-Memory Object Store
//!
//! In-process [`ObjectStore`] for tests and local development.

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;

use super::{ObjectStore, StorageError};

/// Object store backed by a process-local map.
#[derive(Default)]
pub struct InMemoryObjectStore {
    objects: DashMap<String, Bytes>,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn put(&self, key: &str, bytes: Bytes, _content_type: &str) -> Result<(), StorageError> {
        self.objects.insert(key.to_string(), bytes);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Bytes>, StorageError> {
        Ok(self.objects.get(key).map(|b| b.clone()))
    }

    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.objects.contains_key(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_round_trip() {
        let store = InMemoryObjectStore::new();
        store
            .put("reference/adult.csv", Bytes::from_static(b"age,income\n39,<=50K\n"), "text/csv")
            .await
            .unwrap();

        assert!(store.exists("reference/adult.csv").await.unwrap());
        let data = store.get("reference/adult.csv").await.unwrap().unwrap();
        assert_eq!(&data[..], b"age,income\n39,<=50K\n");
    }

    #[tokio::test]
    async fn test_missing_key_is_none_not_error() {
        let store = InMemoryObjectStore::new();
        assert_eq!(store.get("no/such/key").await.unwrap(), None);
        assert!(!store.exists("no/such/key").await.unwrap());
    }
}
