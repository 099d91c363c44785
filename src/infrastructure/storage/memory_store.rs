use std::collections::HashMap;

use bytes::Bytes;
use tokio::sync::RwLock;

use crate::application::ports::{DocumentStore, DocumentStoreError};
use crate::domain::StoragePath;

/// Process-local store for tests and ephemeral runs.
#[derive(Default)]
pub struct InMemoryDocumentStore {
    objects: RwLock<HashMap<String, Bytes>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }
}

#[async_trait::async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn put(&self, path: &StoragePath, data: Bytes) -> Result<u64, DocumentStoreError> {
        let size = data.len() as u64;
        self.objects
            .write()
            .await
            .insert(path.as_str().to_string(), data);
        Ok(size)
    }

    async fn fetch(&self, path: &StoragePath) -> Result<Vec<u8>, DocumentStoreError> {
        self.objects
            .read()
            .await
            .get(path.as_str())
            .map(|b| b.to_vec())
            .ok_or_else(|| DocumentStoreError::NotFound(path.to_string()))
    }

    async fn delete(&self, path: &StoragePath) -> Result<(), DocumentStoreError> {
        self.objects
            .write()
            .await
            .remove(path.as_str())
            .map(|_| ())
            .ok_or_else(|| DocumentStoreError::DeleteFailed(format!("no object at {path}")))
    }
}
