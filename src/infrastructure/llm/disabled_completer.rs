use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::application::ports::{CompletionError, FieldCompleter};

/// Completer used when no text-completion capability is configured. Every
/// call reports [`CompletionError::Disabled`], so extraction runs on
/// geometry and fast paths alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledCompleter;

#[async_trait]
impl FieldCompleter for DisabledCompleter {
    async fn complete_field(
        &self,
        _key: &str,
        _context: &str,
    ) -> Result<Option<String>, CompletionError> {
        Err(CompletionError::Disabled)
    }

    async fn complete_bulk(
        &self,
        _keys: &[String],
        _page_text: &str,
        _current_values: &BTreeMap<String, String>,
    ) -> Result<Vec<String>, CompletionError> {
        Err(CompletionError::Disabled)
    }

    async fn complete_document(
        &self,
        _full_text: &str,
        _schema: &Map<String, Value>,
    ) -> Result<Map<String, Value>, CompletionError> {
        Err(CompletionError::Disabled)
    }
}
