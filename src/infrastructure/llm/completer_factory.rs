use std::sync::Arc;

use crate::application::ports::{FieldCompleter, LlmClientError};
use crate::presentation::config::LlmSettings;

use super::{DisabledCompleter, LlmFieldCompleter, OpenAiClient};

/// Chat-backed completer when enabled, [`DisabledCompleter`] otherwise.
pub fn build_field_completer(
    settings: &LlmSettings,
) -> Result<Arc<dyn FieldCompleter>, LlmClientError> {
    if !settings.enabled {
        tracing::info!("Text completion disabled; extraction uses geometry only");
        return Ok(Arc::new(DisabledCompleter));
    }

    if settings.requires_api_key() && settings.resolved_api_key().is_none() {
        tracing::warn!(
            provider = %settings.provider,
            "No API key configured; completion calls will report a missing credential"
        );
    }
    tracing::info!(
        provider = %settings.provider,
        model = %settings.model,
        base_url = %settings.base_url,
        "Text completion enabled"
    );
    let client = OpenAiClient::new(settings)?;
    Ok(Arc::new(LlmFieldCompleter::new(
        Arc::new(client),
        settings.max_output_tokens,
    )))
}
