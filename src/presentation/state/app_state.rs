use std::sync::Arc;

use crate::application::ports::{JobRepository, WordExtractor};
use crate::application::services::{DocumentExtractor, JobRunner};

#[derive(Clone)]
pub struct AppState {
    pub job_runner: Arc<JobRunner>,
    pub extractor: Arc<DocumentExtractor>,
    pub word_extractor: Arc<dyn WordExtractor>,
    pub worker_secret: Option<String>,
}

impl AppState {
    pub fn job_repository(&self) -> &Arc<dyn JobRepository> {
        self.job_runner.job_repository()
    }
}
