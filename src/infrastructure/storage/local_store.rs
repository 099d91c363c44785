use std::path::PathBuf;
use std::sync::Arc;

use bytes::Bytes;
use object_store::local::LocalFileSystem;
use object_store::path::Path as StorePath;
use object_store::{ObjectStore, PutPayload};

use crate::application::ports::{DocumentStore, DocumentStoreError};
use crate::domain::StoragePath;

/// Documents and results on the local filesystem under one root directory.
pub struct LocalDocumentStore {
    inner: Arc<LocalFileSystem>,
}

impl LocalDocumentStore {
    pub fn new(base_path: PathBuf) -> Result<Self, DocumentStoreError> {
        std::fs::create_dir_all(&base_path).map_err(DocumentStoreError::Io)?;
        let fs = LocalFileSystem::new_with_prefix(base_path)
            .map_err(|e| DocumentStoreError::UploadFailed(e.to_string()))?;
        Ok(Self {
            inner: Arc::new(fs),
        })
    }
}

#[async_trait::async_trait]
impl DocumentStore for LocalDocumentStore {
    async fn put(&self, path: &StoragePath, data: Bytes) -> Result<u64, DocumentStoreError> {
        let store_path = StorePath::from(path.as_str());
        let size = data.len() as u64;
        self.inner
            .put(&store_path, PutPayload::from(data))
            .await
            .map_err(|e| DocumentStoreError::UploadFailed(e.to_string()))?;
        tracing::debug!(path = %path, bytes = size, "Stored object");
        Ok(size)
    }

    async fn fetch(&self, path: &StoragePath) -> Result<Vec<u8>, DocumentStoreError> {
        let store_path = StorePath::from(path.as_str());
        let result = self.inner.get(&store_path).await.map_err(|e| match e {
            object_store::Error::NotFound { .. } => DocumentStoreError::NotFound(path.to_string()),
            other => DocumentStoreError::DownloadFailed(other.to_string()),
        })?;

        let bytes = result
            .bytes()
            .await
            .map_err(|e| DocumentStoreError::DownloadFailed(e.to_string()))?;

        Ok(bytes.to_vec())
    }

    async fn delete(&self, path: &StoragePath) -> Result<(), DocumentStoreError> {
        let store_path = StorePath::from(path.as_str());
        self.inner
            .delete(&store_path)
            .await
            .map_err(|e| DocumentStoreError::DeleteFailed(e.to_string()))
    }
}
