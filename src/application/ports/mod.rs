mod document_store;
mod field_completer;
mod job_repository;
mod llm_client;
mod repository_error;
mod word_extractor;

pub use document_store::{DocumentStore, DocumentStoreError};
pub use field_completer::{CompletionError, FieldCompleter};
pub use job_repository::JobRepository;
pub use llm_client::{CompletionRequest, LlmClient, LlmClientError};
pub use repository_error::RepositoryError;
pub use word_extractor::{WordExtractionError, WordExtractor};
