use serde::Deserialize;

/// Every tunable threshold of the anchor and reading-span engine.
///
/// Distances are in page units. The defaults are the values the engine was
/// calibrated with; settings may override any subset of them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExtractionLimits {
    /// Longest token window tried when matching a schema label.
    pub max_label_window: usize,
    /// Variants shorter than this never match by containment, only exactly.
    pub min_containment_variant_len: usize,
    pub schema_anchor_score: f64,

    pub generic_max_run: usize,
    pub generic_max_label_chars: usize,
    pub generic_min_score: u32,
    pub fuzzy_threshold: f64,
    pub fuzzy_threshold_sparse: f64,
    /// Pages with fewer generic candidates than this use the sparse threshold.
    pub sparse_candidate_count: usize,

    pub min_anchor_distance: f64,
    pub max_anchor_iou: f64,

    pub gutter_pad: f64,
    pub gutter_min_width: f64,
    pub gutter_width_factor: f64,
    pub gutter_slack: f64,

    pub seed_right_clearance: f64,
    pub seed_down_bands: f64,
    pub seed_right_preference: f64,
    pub blocker_pad: f64,

    pub max_tokens_per_line: usize,
    pub max_rightward_tokens: usize,
    pub max_span_tokens: usize,
    pub max_span_width: f64,
    pub max_span_height: f64,
    pub max_extra_lines: usize,
    pub absolute_token_cap: usize,
    pub heading_height_factor: f64,
    pub heading_caps_ratio: f64,

    pub context_max_chars: usize,
    pub field_context_chars: usize,
    pub bulk_page_chars: usize,
    pub document_page_chars: usize,
    pub document_max_chars: usize,
}

impl Default for ExtractionLimits {
    fn default() -> Self {
        Self {
            max_label_window: 8,
            min_containment_variant_len: 3,
            schema_anchor_score: 10.0,

            generic_max_run: 4,
            generic_max_label_chars: 30,
            generic_min_score: 2,
            fuzzy_threshold: 0.35,
            fuzzy_threshold_sparse: 0.30,
            sparse_candidate_count: 12,

            min_anchor_distance: 10.0,
            max_anchor_iou: 0.10,

            gutter_pad: 10.0,
            gutter_min_width: 60.0,
            gutter_width_factor: 0.6,
            gutter_slack: 14.0,

            seed_right_clearance: 2.0,
            seed_down_bands: 5.0,
            seed_right_preference: 2.0,
            blocker_pad: 2.0,

            max_tokens_per_line: 8,
            max_rightward_tokens: 20,
            max_span_tokens: 40,
            max_span_width: 420.0,
            max_span_height: 140.0,
            max_extra_lines: 3,
            absolute_token_cap: 300,
            heading_height_factor: 1.25,
            heading_caps_ratio: 0.85,

            context_max_chars: 600,
            field_context_chars: 320,
            bulk_page_chars: 1800,
            document_page_chars: 3000,
            document_max_chars: 7000,
        }
    }
}
