use std::collections::BTreeMap;
use std::sync::{Arc, LazyLock};
use std::time::Instant;

use async_trait::async_trait;
use regex::Regex;
use serde_json::{Map, Value};

use crate::application::ports::{
    CompletionError, CompletionRequest, FieldCompleter, LlmClient, LlmClientError,
};
use crate::infrastructure::observability::sanitize_prompt;

const FIELD_SYSTEM_PROMPT: &str = "You are a field extractor. Given a possibly noisy excerpt of \
    scanned text, reply with ONLY the value of the requested field, without comments. If the \
    value is in the excerpt, reply with it exactly as written. If it is not, reply exactly: null.";

const BULK_SYSTEM_PROMPT: &str = "You are a field extractor and sanitizer. Given a scanned TEXT \
    and an ordered LIST of keys with raw values, reply with the final values only, IN THE SAME \
    ORDER AS THE KEYS, separated by semicolons.\n\
    Rules:\n\
    - If a raw value exists but is dirty, normalize it (dates dd/mm/yyyy, phones with area code, \
    drop 'label:' prefixes).\n\
    - If the text has no value for a key, write exactly: null.\n\
    - Never invent values. No comments. Only the ';'-separated list of values.";

const DOCUMENT_SYSTEM_PROMPT: &str =
    "Reply only with valid JSON matching the given schema. No comments.";

const QUOTES: &[char] = &[' ', '\t', '\'', '"'];

static OPENING_FENCE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^```(?:json)?\s*").unwrap());
static CLOSING_FENCE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*```$").unwrap());

/// [`FieldCompleter`] backed by a chat model.
pub struct LlmFieldCompleter<L: LlmClient> {
    client: Arc<L>,
    max_output_tokens: usize,
}

impl<L: LlmClient> LlmFieldCompleter<L> {
    pub fn new(client: Arc<L>, max_output_tokens: usize) -> Self {
        Self {
            client,
            max_output_tokens,
        }
    }

    async fn ask(&self, request: CompletionRequest, pass: &'static str) -> Result<String, CompletionError> {
        let started = Instant::now();
        tracing::debug!(pass, prompt = %sanitize_prompt(&request.user), "Sending completion");
        let answer = self.client.complete(&request).await.map_err(completion_error)?;
        tracing::debug!(
            pass,
            elapsed_ms = started.elapsed().as_millis() as u64,
            answer = %sanitize_prompt(&answer),
            "Completion received"
        );
        Ok(answer)
    }
}

#[async_trait]
impl<L: LlmClient + 'static> FieldCompleter for LlmFieldCompleter<L> {
    async fn complete_field(
        &self,
        key: &str,
        context: &str,
    ) -> Result<Option<String>, CompletionError> {
        let request = CompletionRequest {
            system: FIELD_SYSTEM_PROMPT.to_string(),
            user: format!(
                "Field: {key}\nExcerpt:\n{}\nReply with the value only, or null.",
                context.trim()
            ),
            max_output_tokens: self.max_output_tokens.max(8),
        };
        let answer = self.ask(request, "field").await?;
        Ok(parse_single_value(&answer))
    }

    async fn complete_bulk(
        &self,
        keys: &[String],
        page_text: &str,
        current_values: &BTreeMap<String, String>,
    ) -> Result<Vec<String>, CompletionError> {
        let key_lines = keys
            .iter()
            .map(|k| {
                let current = current_values.get(k).map(|v| v.trim()).unwrap_or_default();
                format!("{k}={current}")
            })
            .collect::<Vec<_>>()
            .join("\n");
        let request = CompletionRequest {
            system: BULK_SYSTEM_PROMPT.to_string(),
            user: format!(
                "SCANNED_TEXT:\n{page_text}\n\n\
                 KEYS_AND_RAW_VALUES (in order):\n{key_lines}\n\n\
                 Reply format (this single line, no extra spaces):\n\
                 value1;value2;value3;...\n\
                 Use 'null' when a value does not exist."
            ),
            max_output_tokens: 64usize.max(8 * keys.len()),
        };
        let answer = self.ask(request, "bulk").await?;
        parse_bulk_values(&answer)
    }

    async fn complete_document(
        &self,
        full_text: &str,
        schema: &Map<String, Value>,
    ) -> Result<Map<String, Value>, CompletionError> {
        let schema_json = serde_json::to_string_pretty(schema)
            .map_err(|e| CompletionError::MalformedResponse(e.to_string()))?;
        let request = CompletionRequest {
            system: DOCUMENT_SYSTEM_PROMPT.to_string(),
            user: format!(
                "You are a data extraction assistant (JSON extractor).\n\
                 Extract the requested information from the text of a document.\n\
                 The text may be out of order.\n\n\
                 DOCUMENT TEXT:\n---\n{full_text}\n---\n\n\
                 JSON SCHEMA TO FILL:\n\
                 (Reply *only* with the JSON. Use null for any field not found.)\n\n\
                 {schema_json}"
            ),
            max_output_tokens: 128usize.max(16 * schema.len()),
        };
        let answer = self.ask(request, "document").await?;
        parse_json_object(&answer)
    }
}

fn completion_error(e: LlmClientError) -> CompletionError {
    match e {
        LlmClientError::MissingCredential => CompletionError::Unavailable(e.to_string()),
        LlmClientError::ApiRequestFailed(_) | LlmClientError::RateLimited => {
            CompletionError::Transport(e.to_string())
        }
        LlmClientError::InvalidResponse(msg) => CompletionError::MalformedResponse(msg),
    }
}

/// First line of the answer with quotes trimmed; `None` for `null` or blank.
pub fn parse_single_value(answer: &str) -> Option<String> {
    let line = answer.trim().lines().next()?.trim_matches(QUOTES);
    (!line.is_empty() && !line.eq_ignore_ascii_case("null")).then(|| line.to_string())
}

/// Semicolon-separated values from the first line of the answer.
pub fn parse_bulk_values(answer: &str) -> Result<Vec<String>, CompletionError> {
    let line = answer
        .trim()
        .lines()
        .next()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .ok_or_else(|| CompletionError::MalformedResponse("empty bulk answer".to_string()))?;
    Ok(line
        .split(';')
        .map(|v| v.trim_matches(QUOTES).to_string())
        .collect())
}

/// Strips code fences and surrounding noise, then parses the outermost
/// `{...}` as a JSON object.
pub fn parse_json_object(answer: &str) -> Result<Map<String, Value>, CompletionError> {
    let trimmed = answer.trim();
    let unfenced = OPENING_FENCE.replace(trimmed, "");
    let unfenced = CLOSING_FENCE.replace(&unfenced, "");
    let candidate = match (unfenced.find('{'), unfenced.rfind('}')) {
        (Some(start), Some(end)) if start < end => &unfenced[start..=end],
        _ => &unfenced[..],
    };
    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(CompletionError::MalformedResponse(
            "answer is not a JSON object".to_string(),
        )),
        Err(e) => Err(CompletionError::MalformedResponse(e.to_string())),
    }
}
