use std::io;

use bytes::Bytes;

use crate::domain::StoragePath;

/// Blob storage for source documents and extraction results.
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    async fn put(&self, path: &StoragePath, data: Bytes) -> Result<u64, DocumentStoreError>;

    async fn fetch(&self, path: &StoragePath) -> Result<Vec<u8>, DocumentStoreError>;

    async fn delete(&self, path: &StoragePath) -> Result<(), DocumentStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DocumentStoreError {
    #[error("upload failed: {0}")]
    UploadFailed(String),
    #[error("object not found: {0}")]
    NotFound(String),
    #[error("download failed: {0}")]
    DownloadFailed(String),
    #[error("delete failed: {0}")]
    DeleteFailed(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
