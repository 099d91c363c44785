use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::application::ports::{DocumentStore, DocumentStoreError, WordExtractor};
use crate::domain::{Schema, StoragePath};

use super::document_extractor::DocumentExtractor;
use super::fallback_orchestrator::FallbackStats;

const DOCUMENT_NOT_FOUND: &str = "document_not_found";
const DOCUMENT_UNREADABLE: &str = "document_unreadable";
const WORD_EXTRACTION_FAILED: &str = "word_extraction_failed";
const SCHEMA_MISSING: &str = "schema_missing";
const INVALID_ITEM: &str = "invalid_item";

#[derive(Debug, Clone, Deserialize)]
pub struct DatasetItem {
    #[serde(alias = "pdf_path")]
    pub document_path: String,
    #[serde(default)]
    pub extraction_schema: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchTiming {
    pub per_page_seconds: Vec<f64>,
    pub mean_seconds: f64,
}

/// One line of the batch report. Failed items carry `error` and a null result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchOutput {
    pub document: String,
    pub result: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timing: Option<BatchTiming>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<FallbackStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BatchOutput {
    fn failed(document: impl Into<String>, error: &str) -> Self {
        Self {
            document: document.into(),
            result: None,
            timing: None,
            fallback: None,
            error: Some(error.to_string()),
        }
    }
}

/// Runs a dataset of documents through extraction one after another,
/// skipping (and marking) units whose inputs are missing.
pub struct BatchRunner {
    document_store: Arc<dyn DocumentStore>,
    word_extractor: Arc<dyn WordExtractor>,
    extractor: Arc<DocumentExtractor>,
}

impl BatchRunner {
    pub fn new(
        document_store: Arc<dyn DocumentStore>,
        word_extractor: Arc<dyn WordExtractor>,
        extractor: Arc<DocumentExtractor>,
    ) -> Self {
        Self {
            document_store,
            word_extractor,
            extractor,
        }
    }

    pub async fn load_dataset(path: &std::path::Path) -> Result<Value, BatchError> {
        let raw = tokio::fs::read_to_string(path).await?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// `dataset` must be a JSON list; anything else fails the whole run.
    pub async fn run(&self, dataset: &Value) -> Result<Vec<BatchOutput>, BatchError> {
        let items = dataset.as_array().ok_or(BatchError::DatasetNotList)?;
        tracing::info!(items = items.len(), "Batch started");

        let mut outputs = Vec::with_capacity(items.len());
        for raw in items {
            let output = match serde_json::from_value::<DatasetItem>(raw.clone()) {
                Ok(item) => self.run_item(&item).await,
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping malformed dataset item");
                    BatchOutput::failed(String::new(), INVALID_ITEM)
                }
            };
            outputs.push(output);
        }
        Ok(outputs)
    }

    #[tracing::instrument(skip(self, item), fields(document = %item.document_path))]
    pub async fn run_item(&self, item: &DatasetItem) -> BatchOutput {
        let document = item.document_path.clone();
        let schema = Schema::parse(&item.extraction_schema);
        if schema.is_empty() {
            tracing::warn!("Schema missing");
            return BatchOutput::failed(document, SCHEMA_MISSING);
        }

        let path = StoragePath::from_raw(document.clone());
        let data = match self.document_store.fetch(&path).await {
            Ok(data) => data,
            Err(DocumentStoreError::NotFound(_)) => {
                tracing::warn!("Document not found");
                return BatchOutput::failed(document, DOCUMENT_NOT_FOUND);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Document unreadable");
                return BatchOutput::failed(document, DOCUMENT_UNREADABLE);
            }
        };

        let pages = match self.word_extractor.extract_pages(&data) {
            Ok(pages) => pages,
            Err(e) => {
                tracing::warn!(error = %e, "Word extraction failed");
                return BatchOutput::failed(document, WORD_EXTRACTION_FAILED);
            }
        };

        tracing::info!(pages = pages.len(), keys = schema.len(), "Extracting document");
        let extraction = self.extractor.extract(&pages, &schema).await;
        BatchOutput {
            document,
            result: Some(extraction.values),
            timing: Some(BatchTiming {
                per_page_seconds: extraction.per_page_seconds,
                mean_seconds: extraction.mean_seconds,
            }),
            fallback: Some(extraction.stats),
            error: None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("dataset must be a JSON list of items")]
    DatasetNotList,
    #[error("dataset unreadable: {0}")]
    Io(#[from] std::io::Error),
    #[error("dataset is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}
