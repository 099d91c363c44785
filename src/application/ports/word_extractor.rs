use crate::domain::Page;

/// Turns a stored document into positioned word pages.
pub trait WordExtractor: Send + Sync {
    fn extract_pages(&self, data: &[u8]) -> Result<Vec<Page>, WordExtractionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum WordExtractionError {
    #[error("unsupported document: {0}")]
    Unsupported(String),
    #[error("extraction failed: {0}")]
    ExtractionFailed(String),
}
