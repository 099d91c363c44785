use std::path::PathBuf;
use std::sync::Arc;

use crate::application::ports::{DocumentStore, DocumentStoreError};
use crate::presentation::config::{StorageProviderSetting, StorageSettings};

use super::local_store::LocalDocumentStore;
use super::memory_store::InMemoryDocumentStore;

pub struct DocumentStoreFactory;

impl DocumentStoreFactory {
    pub fn create(settings: &StorageSettings) -> Result<Arc<dyn DocumentStore>, DocumentStoreError> {
        match settings.provider {
            StorageProviderSetting::Local => {
                let path = PathBuf::from(&settings.local_path);
                tracing::info!(path = %path.display(), "Using local document store");
                let store = LocalDocumentStore::new(path)?;
                Ok(Arc::new(store))
            }
            StorageProviderSetting::Memory => {
                tracing::info!("Using in-memory document store");
                Ok(Arc::new(InMemoryDocumentStore::new()))
            }
        }
    }
}
