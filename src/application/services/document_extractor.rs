use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::application::ports::FieldCompleter;
use crate::domain::{ExtractionLimits, ExtractionState, Page, Schema};

use super::fallback_orchestrator::{
    FallbackOrchestrator, FallbackPolicy, FallbackStats, field_context,
};
use super::page_extractor::PageExtractor;
use super::text_normalizer::truncate_chars;

/// Final values of one document plus how long each page took.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentExtraction {
    pub values: Map<String, Value>,
    pub per_page_seconds: Vec<f64>,
    pub mean_seconds: f64,
    pub stats: FallbackStats,
}

/// Runs every page through geometry and per-field fallback, merges page
/// values into one state, then applies the bulk and whole-document passes.
pub struct DocumentExtractor {
    pages: PageExtractor,
    fallback: FallbackOrchestrator,
}

impl DocumentExtractor {
    pub fn new(
        completer: Arc<dyn FieldCompleter>,
        policy: FallbackPolicy,
        limits: ExtractionLimits,
    ) -> Self {
        Self {
            pages: PageExtractor::new(limits.clone()),
            fallback: FallbackOrchestrator::new(completer, policy, limits),
        }
    }

    #[tracing::instrument(skip_all, fields(pages = pages.len(), keys = schema.len()))]
    pub async fn extract(&self, pages: &[Page], schema: &Schema) -> DocumentExtraction {
        let keys = schema.keys();
        let mut state = ExtractionState::new(schema);
        let mut stats = FallbackStats::default();
        let mut per_page_seconds = Vec::with_capacity(pages.len());
        let mut page_texts = Vec::with_capacity(pages.len());

        for page in pages {
            let started = Instant::now();
            let page_raw = self.extract_page(page, &keys, &mut state, &mut stats).await;
            per_page_seconds.push(round_micros(started.elapsed().as_secs_f64()));

            let page_text = page.reading_order_text();
            self.fallback
                .bulk_pass(&keys, &page_text, &page_raw, &mut state, &mut stats)
                .await;
            page_texts.push(page_text);
        }

        self.fallback
            .document_pass(&page_texts, &mut state, &mut stats)
            .await;

        let mean_seconds = if per_page_seconds.is_empty() {
            0.0
        } else {
            round_micros(per_page_seconds.iter().sum::<f64>() / per_page_seconds.len() as f64)
        };
        tracing::info!(
            attempts = stats.attempts,
            successes = stats.successes,
            fast_path_hits = stats.fast_path_hits,
            mean_seconds,
            "Document extracted"
        );

        DocumentExtraction {
            values: state.into_values(),
            per_page_seconds,
            mean_seconds,
            stats,
        }
    }

    /// Reads one page, fills gaps per field where geometry failed, and merges
    /// the page's values. Returns the raw per-key values seen on the page.
    async fn extract_page(
        &self,
        page: &Page,
        keys: &[String],
        state: &mut ExtractionState,
        stats: &mut FallbackStats,
    ) -> BTreeMap<String, String> {
        let reading = self.pages.read_page(page, keys);
        let limits = self.pages.limits();
        let mut page_raw = BTreeMap::new();

        for (anchor, result) in reading.anchors.iter().zip(reading.results) {
            let mut text = result.text.trim().to_string();
            let had_span = result.seed.is_some();
            if text.is_empty() && self.fallback.wants_field_call(anchor, had_span) {
                let context = field_context(page, anchor, &reading.layout, limits);
                if let Some(value) = self
                    .fallback
                    .complete_field(&anchor.key, &context, stats)
                    .await
                {
                    text = value;
                }
            }

            tracing::debug!(
                key = %anchor.key,
                origin = %anchor.origin,
                direction = ?result.direction,
                composed = result.composed,
                value = truncate_chars(&text, 80),
                "Field read"
            );
            if result.composed {
                state.mark_composed(&anchor.key);
            }
            state.fill_if_absent(&anchor.key, &text);
            page_raw.insert(anchor.key.clone(), text);
        }
        page_raw
    }
}

fn round_micros(seconds: f64) -> f64 {
    (seconds * 1e6).round() / 1e6
}
