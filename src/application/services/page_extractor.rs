use crate::domain::{
    Anchor, ClaimedTokens, ExtractionLimits, FieldResult, LayoutConfig, Page,
};

use super::anchor_resolver::resolve_conflicts;
use super::generic_anchor_detector::{assign_generic_anchors, detect_generic_anchors};
use super::reading_span_builder::ReadingSpanBuilder;
use super::schema_anchor_locator::locate_schema_anchor;

/// Geometry-only reading of one page. `results[i]` belongs to `anchors[i]`;
/// both are in processing order (top-to-bottom, left-to-right).
#[derive(Debug, Clone)]
pub struct PageReading {
    pub layout: LayoutConfig,
    pub anchors: Vec<Anchor>,
    pub results: Vec<FieldResult>,
}

impl PageReading {
    pub fn result(&self, key: &str) -> Option<&FieldResult> {
        self.results.iter().find(|r| r.key == key)
    }
}

#[derive(Debug, Clone, Default)]
pub struct PageExtractor {
    limits: ExtractionLimits,
}

impl PageExtractor {
    pub fn new(limits: ExtractionLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &ExtractionLimits {
        &self.limits
    }

    /// Anchors for `keys` on `page` after conflict resolution, sorted for
    /// processing.
    pub fn locate_anchors(&self, page: &Page, keys: &[String], layout: &LayoutConfig) -> Vec<Anchor> {
        let mut anchors = Vec::with_capacity(keys.len());
        let mut missing = Vec::new();
        for key in keys {
            match locate_schema_anchor(key, page, &self.limits) {
                Some(anchor) => anchors.push(anchor),
                None => missing.push(key.clone()),
            }
        }

        if !missing.is_empty() {
            let candidates = detect_generic_anchors(page, layout, &self.limits);
            anchors.extend(assign_generic_anchors(&missing, &candidates, &self.limits));
        }

        let mut kept = resolve_conflicts(anchors, &self.limits);
        kept.sort_by(|a, b| {
            a.point
                .y
                .total_cmp(&b.point.y)
                .then(a.point.x.total_cmp(&b.point.x))
        });
        kept
    }

    pub fn read_page(&self, page: &Page, keys: &[String]) -> PageReading {
        let layout = LayoutConfig::calibrate(&page.tokens);
        let anchors = self.locate_anchors(page, keys, &layout);
        let builder = ReadingSpanBuilder::new(page, &layout, &self.limits, &anchors);

        let mut claimed = ClaimedTokens::new();
        let mut results = Vec::with_capacity(anchors.len());
        for anchor in &anchors {
            let (span, next_claimed) = builder.build(anchor, &anchors, claimed);
            claimed = next_claimed;
            results.push(match span {
                Some(span) => FieldResult::from_span(anchor, span),
                None => FieldResult::without_span(anchor),
            });
        }

        tracing::debug!(
            page = page.number,
            tokens = page.len(),
            anchors = anchors.len(),
            spans = results.iter().filter(|r| r.seed.is_some()).count(),
            claimed = claimed.len(),
            "Page read"
        );
        PageReading {
            layout,
            anchors,
            results,
        }
    }
}
