use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::application::ports::FieldCompleter;
use crate::domain::{
    Anchor, ExtractionLimits, ExtractionState, LayoutConfig, Page, Schema, TokenIndex,
};

use super::fast_path::fast_path_value;
use super::text_normalizer::{head_tail, truncate_chars};

const PAGE_SEPARATOR: &str = "\n\n";
const ELISION: &str = "\n...\n";

/// Which fallback passes run and how their answers are merged.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FallbackPolicy {
    /// Empty-seed anchors only trigger a per-field call when they came from
    /// a direct key match.
    pub per_field_schema_only: bool,
    /// Bulk answers replace values the engine already found.
    pub sanitize_existing: bool,
    pub bulk_enabled: bool,
    pub document_pass_enabled: bool,
    pub document_pass_includes_composed: bool,
}

impl Default for FallbackPolicy {
    fn default() -> Self {
        Self {
            per_field_schema_only: true,
            sanitize_existing: true,
            bulk_enabled: true,
            document_pass_enabled: true,
            document_pass_includes_composed: true,
        }
    }
}

/// Per-document counters of fallback activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FallbackStats {
    pub attempts: u32,
    pub successes: u32,
    pub fast_path_hits: u32,
}

/// Decides when geometry has failed, consults the completer, and merges its
/// answers into the document state without clobbering earlier finds.
pub struct FallbackOrchestrator {
    completer: Arc<dyn FieldCompleter>,
    policy: FallbackPolicy,
    limits: ExtractionLimits,
}

impl FallbackOrchestrator {
    pub fn new(
        completer: Arc<dyn FieldCompleter>,
        policy: FallbackPolicy,
        limits: ExtractionLimits,
    ) -> Self {
        Self {
            completer,
            policy,
            limits,
        }
    }

    pub fn policy(&self) -> &FallbackPolicy {
        &self.policy
    }

    /// A missing seed only warrants a call for schema anchors (unless the
    /// policy widens it); a span that read as empty always does.
    pub fn wants_field_call(&self, anchor: &Anchor, had_span: bool) -> bool {
        had_span || anchor.origin.is_schema() || !self.policy.per_field_schema_only
    }

    #[tracing::instrument(skip(self, context, stats), fields(context_chars = context.len()))]
    pub async fn complete_field(
        &self,
        key: &str,
        context: &str,
        stats: &mut FallbackStats,
    ) -> Option<String> {
        stats.attempts += 1;
        let context = truncate_chars(context.trim(), self.limits.field_context_chars);
        if context.is_empty() {
            tracing::debug!("Skipping field completion: empty context");
            return None;
        }

        if let Some(hit) = fast_path_value(key, context) {
            stats.fast_path_hits += 1;
            stats.successes += 1;
            tracing::info!(value = %hit, "Field resolved by fast path");
            return Some(hit);
        }

        let started = Instant::now();
        match self.completer.complete_field(key, context).await {
            Ok(Some(value)) if !value.trim().is_empty() => {
                stats.successes += 1;
                tracing::info!(
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    value = truncate_chars(&value, 80),
                    "Field completed"
                );
                Some(value.trim().to_string())
            }
            Ok(_) => {
                tracing::info!(
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Completer found no value"
                );
                None
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Field completion unavailable"
                );
                None
            }
        }
    }

    /// Sends every key with the page text and the engine's raw values, then
    /// merges the aligned answers into `state`.
    #[tracing::instrument(skip_all, fields(keys = keys.len()))]
    pub async fn bulk_pass(
        &self,
        keys: &[String],
        page_text: &str,
        page_raw: &BTreeMap<String, String>,
        state: &mut ExtractionState,
        stats: &mut FallbackStats,
    ) {
        if !self.policy.bulk_enabled || keys.is_empty() {
            return;
        }
        stats.attempts += 1;
        let page_text = truncate_chars(page_text, self.limits.bulk_page_chars);
        let started = Instant::now();

        let answers = match self.completer.complete_bulk(keys, page_text, page_raw).await {
            Ok(answers) => answers,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Bulk completion unavailable"
                );
                return;
            }
        };

        let mut changed = false;
        for (key, raw) in keys.iter().zip(align_answers(answers, keys.len())) {
            let Some(value) = found_value(&raw) else {
                continue;
            };
            if page_raw.get(key).map(|v| v.trim()) != Some(value) {
                changed = true;
            }
            if !state.fill_if_absent(key, value) && self.policy.sanitize_existing {
                state.overwrite(key, value);
            }
        }
        if changed {
            stats.successes += 1;
        }
        tracing::info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            changed,
            "Bulk pass merged"
        );
    }

    /// Last pass over the whole document text for keys still empty (and,
    /// by policy, keys whose value was assembled from several tokens).
    /// Never replaces a non-empty value.
    #[tracing::instrument(skip_all, fields(pages = page_texts.len()))]
    pub async fn document_pass(
        &self,
        page_texts: &[String],
        state: &mut ExtractionState,
        stats: &mut FallbackStats,
    ) {
        if !self.policy.document_pass_enabled {
            return;
        }
        let keys = if self.policy.document_pass_includes_composed {
            state.missing_or_composed_keys()
        } else {
            state.missing_keys()
        };
        if keys.is_empty() {
            return;
        }

        stats.attempts += 1;
        let full_text = self.document_text(page_texts);
        let schema = Schema::nulled(&keys);
        let started = Instant::now();

        let answers = match self.completer.complete_document(&full_text, &schema).await {
            Ok(answers) => answers,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Document completion unavailable"
                );
                return;
            }
        };
        stats.successes += 1;

        let mut filled = 0usize;
        for key in &keys {
            let Some(value) = answers.get(key).and_then(scalar_text) else {
                continue;
            };
            if state.fill_if_absent(key, &value) {
                filled += 1;
            }
        }
        tracing::info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            requested = keys.len(),
            filled,
            "Document pass merged"
        );
    }

    /// Per-page text with long pages elided in the middle, joined, then
    /// trimmed to the document budget keeping head and tail.
    pub fn document_text(&self, page_texts: &[String]) -> String {
        let page_limit = self.limits.document_page_chars;
        let head = page_limit * 2 / 3;
        let joined = page_texts
            .iter()
            .map(|t| head_tail(t, head, page_limit - head, ELISION))
            .collect::<Vec<_>>()
            .join(PAGE_SEPARATOR);
        let max = self.limits.document_max_chars;
        head_tail(&joined, max / 2, max / 2, ELISION)
    }
}

/// Text of the tokens surrounding an anchor, in reading order. The window
/// spans from just left of the label to well past its gutter, and from two
/// bands above to five bands below the anchor.
pub fn field_context(
    page: &Page,
    anchor: &Anchor,
    layout: &LayoutConfig,
    limits: &ExtractionLimits,
) -> String {
    let label = &anchor.label_bbox;
    let gutter = &anchor.gutter;
    let x0 = label.x1.min(gutter.x0) - 10.0;
    let x1 = (label.x1 + 1.5 * gutter.width()).max(gutter.x1 + 30.0);
    let y0 = anchor.point.y - 2.0 * layout.y_band;
    let y1 = anchor.point.y + 5.0 * layout.y_band;

    let inside: Vec<TokenIndex> = (0..page.len())
        .filter(|&i| {
            let c = page.center(i);
            (x0..=x1).contains(&c.x) && (y0..=y1).contains(&c.y)
        })
        .collect();
    let text = page.join_text(&inside);
    truncate_chars(&text, limits.context_max_chars).to_string()
}

fn align_answers(mut answers: Vec<String>, len: usize) -> Vec<String> {
    answers.resize(len, "null".to_string());
    answers
}

fn found_value(raw: &str) -> Option<&str> {
    let value = raw.trim();
    (!value.is_empty() && !value.eq_ignore_ascii_case("null")).then_some(value)
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => found_value(s).map(str::to_string),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
