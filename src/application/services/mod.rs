mod anchor_resolver;
mod batch_runner;
mod document_extractor;
mod extraction_worker;
mod fallback_orchestrator;
mod fast_path;
mod generic_anchor_detector;
mod job_runner;
mod page_extractor;
mod reading_span_builder;
mod schema_anchor_locator;
pub mod text_normalizer;

pub use anchor_resolver::resolve_conflicts;
pub use batch_runner::{BatchError, BatchOutput, BatchRunner, BatchTiming, DatasetItem};
pub use document_extractor::{DocumentExtraction, DocumentExtractor};
pub use extraction_worker::ExtractionWorker;
pub use fallback_orchestrator::{
    FallbackOrchestrator, FallbackPolicy, FallbackStats, field_context,
};
pub use fast_path::fast_path_value;
pub use generic_anchor_detector::{
    assign_generic_anchors, detect_generic_anchors, is_abbreviation, label_similarity,
    looks_like_label,
};
pub use job_runner::{JobRunSummary, JobRunner, JobRunnerError};
pub use page_extractor::{PageExtractor, PageReading};
pub use reading_span_builder::ReadingSpanBuilder;
pub use schema_anchor_locator::locate_schema_anchor;
pub use text_normalizer::label_variants;
