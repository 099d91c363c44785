mod error_response;
mod extract;
mod health;
mod job_status;
mod process_job;

pub use error_response::ErrorResponse;
pub use extract::{ExtractRequest, extract_handler};
pub use health::health_handler;
pub use job_status::{JobItemResponse, JobStatusResponse, job_status_handler};
pub use process_job::{
    ProcessJobRequest, ProcessJobResponse, WORKER_SECRET_HEADER, process_job_handler,
};
