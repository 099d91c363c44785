use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use serde::Serialize;

use crate::application::ports::{
    DocumentStore, DocumentStoreError, JobRepository, RepositoryError, WordExtractionError,
    WordExtractor,
};
use crate::domain::{
    ItemOutcome, ItemStatus, JobId, JobItem, JobProgress, JobStatus, Schema, StoragePath,
};

use super::document_extractor::DocumentExtractor;

/// Counts returned by [`JobRunner::run_job`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct JobRunSummary {
    pub processed: usize,
    pub done: usize,
    pub error: usize,
}

/// Claims queued items, runs extraction on their stored documents, persists
/// the results and keeps the job's aggregate counters current.
pub struct JobRunner {
    job_repository: Arc<dyn JobRepository>,
    document_store: Arc<dyn DocumentStore>,
    word_extractor: Arc<dyn WordExtractor>,
    extractor: Arc<DocumentExtractor>,
}

impl JobRunner {
    pub fn new(
        job_repository: Arc<dyn JobRepository>,
        document_store: Arc<dyn DocumentStore>,
        word_extractor: Arc<dyn WordExtractor>,
        extractor: Arc<DocumentExtractor>,
    ) -> Self {
        Self {
            job_repository,
            document_store,
            word_extractor,
            extractor,
        }
    }

    pub fn job_repository(&self) -> &Arc<dyn JobRepository> {
        &self.job_repository
    }

    /// Processes one item end to end. Returns `None` when another worker
    /// already claimed it. Only repository failures surface as `Err`; every
    /// other failure is recorded on the item.
    #[tracing::instrument(
        skip(self, item),
        fields(job_id = %item.job_id.as_uuid(), item_id = %item.id.as_uuid(), file = %item.file_name)
    )]
    pub async fn process_item(&self, item: &JobItem) -> Result<Option<ItemOutcome>, JobRunnerError> {
        if !self.job_repository.claim_item(item.id).await? {
            tracing::debug!("Item already claimed");
            return Ok(None);
        }

        let started = Instant::now();
        let result = self.run_pipeline(item).await;
        let duration_ms = started.elapsed().as_millis() as i64;

        let outcome = match result {
            Ok(path) => {
                tracing::info!(duration_ms, result_path = %path, "Item extracted");
                ItemOutcome::done(duration_ms, path.to_string())
            }
            Err(e) => {
                tracing::error!(error = %e, duration_ms, "Item failed");
                ItemOutcome::failed(duration_ms, e.to_string())
            }
        };

        self.job_repository.update_item(item.id, &outcome).await?;
        self.refresh_progress(item.job_id).await?;
        Ok(Some(outcome))
    }

    /// Marks a queued job running and works through its pending items in
    /// creation order.
    #[tracing::instrument(skip(self), fields(job_id = %job_id.as_uuid()))]
    pub async fn run_job(&self, job_id: JobId) -> Result<JobRunSummary, JobRunnerError> {
        self.job_repository
            .get_job(job_id)
            .await?
            .ok_or(JobRunnerError::JobNotFound(job_id))?;
        self.job_repository.mark_job_running(job_id).await?;

        let items = self.job_repository.list_pending_for_job(job_id).await?;

        let mut summary = JobRunSummary::default();
        for item in &items {
            let outcome = match self.process_item(item).await {
                Ok(Some(outcome)) => outcome,
                Ok(None) => continue,
                Err(e) => {
                    tracing::error!(error = %e, item_id = %item.id.as_uuid(), "Item processing failed");
                    self.record_failure(item, &e).await
                }
            };
            summary.processed += 1;
            match outcome.status {
                ItemStatus::Done => summary.done += 1,
                _ => summary.error += 1,
            }
        }
        self.refresh_progress(job_id).await?;
        tracing::info!(
            processed = summary.processed,
            done = summary.done,
            error = summary.error,
            "Job run finished"
        );
        Ok(summary)
    }

    /// Best-effort error marker for an item whose processing hit the
    /// repository, so it does not stay `running`.
    async fn record_failure(&self, item: &JobItem, error: &JobRunnerError) -> ItemOutcome {
        let outcome = ItemOutcome::failed(0, error.to_string());
        if let Err(e) = self.job_repository.update_item(item.id, &outcome).await {
            tracing::warn!(error = %e, item_id = %item.id.as_uuid(), "Could not record item failure");
        }
        outcome
    }

    async fn run_pipeline(&self, item: &JobItem) -> Result<StoragePath, JobRunnerError> {
        let schema = Schema::parse(&item.schema);
        if schema.is_empty() {
            return Err(JobRunnerError::SchemaMissing);
        }

        let source = StoragePath::from_raw(item.file_path.clone());
        let data = self.document_store.fetch(&source).await?;
        let pages = self.word_extractor.extract_pages(&data)?;
        tracing::debug!(pages = pages.len(), keys = schema.len(), "Document loaded");

        let extraction = self.extractor.extract(&pages, &schema).await;
        let body = serde_json::to_vec_pretty(&extraction.values)?;

        let result_path = StoragePath::item_result(&item.job_id, &item.id);
        self.document_store
            .put(&result_path, Bytes::from(body))
            .await?;
        Ok(result_path)
    }

    async fn refresh_progress(&self, job_id: JobId) -> Result<JobStatus, JobRunnerError> {
        let statuses: Vec<ItemStatus> = self
            .job_repository
            .items_for_job(job_id)
            .await?
            .into_iter()
            .map(|i| i.status)
            .collect();
        let progress = JobProgress::from_items(&statuses);
        self.job_repository
            .update_job_progress(job_id, progress)
            .await?;
        tracing::debug!(
            total = progress.total,
            done = progress.done,
            error = progress.error,
            status = %progress.status,
            "Job progress updated"
        );
        Ok(progress.status)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JobRunnerError {
    #[error("job not found: {}", .0.as_uuid())]
    JobNotFound(JobId),
    #[error("schema_missing")]
    SchemaMissing,
    #[error("repository: {0}")]
    Repository(#[from] RepositoryError),
    #[error("document store: {0}")]
    Storage(#[from] DocumentStoreError),
    #[error("word extraction: {0}")]
    WordExtraction(#[from] WordExtractionError),
    #[error("serialization: {0}")]
    Serialization(#[from] serde_json::Error),
}
