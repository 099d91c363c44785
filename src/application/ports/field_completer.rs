use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::{Map, Value};

/// External text-completion capability consulted when geometry fails.
///
/// Every call may fail; callers treat any `Err` as "no answer".
#[async_trait]
pub trait FieldCompleter: Send + Sync {
    /// Value of one field read from a short context window, `None` when the
    /// capability reports it absent.
    async fn complete_field(&self, key: &str, context: &str)
    -> Result<Option<String>, CompletionError>;

    /// One raw value per key, in key order. `"null"` marks a value not found.
    async fn complete_bulk(
        &self,
        keys: &[String],
        page_text: &str,
        current_values: &BTreeMap<String, String>,
    ) -> Result<Vec<String>, CompletionError>;

    /// Partial JSON object keyed by field; unknown or absent keys mean null.
    async fn complete_document(
        &self,
        full_text: &str,
        schema: &Map<String, Value>,
    ) -> Result<Map<String, Value>, CompletionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("completion disabled")]
    Disabled,
    #[error("capability unavailable: {0}")]
    Unavailable(String),
    #[error("transport failed: {0}")]
    Transport(String),
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}
