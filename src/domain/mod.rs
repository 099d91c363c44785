mod anchor;
mod bounding_box;
mod claimed_tokens;
mod extraction_limits;
mod extraction_state;
mod field_result;
mod job;
mod job_status;
mod layout_config;
mod page;
mod schema;
mod storage_path;
mod token;

pub use anchor::{Anchor, AnchorOrigin, Gutter};
pub use bounding_box::{BoundingBox, Point};
pub use claimed_tokens::ClaimedTokens;
pub use extraction_limits::ExtractionLimits;
pub use extraction_state::ExtractionState;
pub use field_result::{FieldResult, ReadingSpan, SpanDirection};
pub use job::{ItemOutcome, Job, JobId, JobItem, JobItemId, JobProgress};
pub use job_status::{ItemStatus, JobStatus};
pub use layout_config::LayoutConfig;
pub use page::Page;
pub use schema::Schema;
pub use storage_path::StoragePath;
pub use token::{Token, TokenIndex};
