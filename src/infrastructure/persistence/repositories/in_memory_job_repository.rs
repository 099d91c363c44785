use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::application::ports::{JobRepository, RepositoryError};
use crate::domain::{
    ItemOutcome, ItemStatus, Job, JobId, JobItem, JobItemId, JobProgress, JobStatus,
};

#[derive(Default)]
struct Tables {
    jobs: HashMap<JobId, Job>,
    items: Vec<JobItem>,
}

/// [`JobRepository`] kept in process memory. Used when no database is
/// configured and by tests.
#[derive(Default)]
pub struct InMemoryJobRepository {
    tables: Mutex<Tables>,
}

impl InMemoryJobRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_job(&self, job: Job) {
        self.tables.lock().await.jobs.insert(job.id, job);
    }

    pub async fn insert_item(&self, item: JobItem) -> Result<(), RepositoryError> {
        let mut tables = self.tables.lock().await;
        if !tables.jobs.contains_key(&item.job_id) {
            return Err(RepositoryError::ConstraintViolation(format!(
                "job {} does not exist",
                item.job_id.as_uuid()
            )));
        }
        tables.items.push(item);
        Ok(())
    }

    pub async fn get_item(&self, id: JobItemId) -> Option<JobItem> {
        self.tables
            .lock()
            .await
            .items
            .iter()
            .find(|i| i.id == id)
            .cloned()
    }
}

fn oldest_first(mut items: Vec<JobItem>) -> Vec<JobItem> {
    items.sort_by_key(|i| i.created_at);
    items
}

#[async_trait]
impl JobRepository for InMemoryJobRepository {
    async fn get_job(&self, id: JobId) -> Result<Option<Job>, RepositoryError> {
        Ok(self.tables.lock().await.jobs.get(&id).cloned())
    }

    async fn mark_job_running(&self, id: JobId) -> Result<(), RepositoryError> {
        let mut tables = self.tables.lock().await;
        if let Some(job) = tables.jobs.get_mut(&id) {
            if job.status == JobStatus::Queued {
                job.status = JobStatus::Running;
                job.updated_at = Utc::now();
            }
        }
        Ok(())
    }

    async fn update_job_progress(
        &self,
        id: JobId,
        progress: JobProgress,
    ) -> Result<(), RepositoryError> {
        let mut tables = self.tables.lock().await;
        let job = tables
            .jobs
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::NotFound(id.as_uuid().to_string()))?;
        job.total_count = progress.total;
        job.done_count = progress.done;
        job.error_count = progress.error;
        job.status = progress.status;
        job.updated_at = Utc::now();
        Ok(())
    }

    async fn items_for_job(&self, job_id: JobId) -> Result<Vec<JobItem>, RepositoryError> {
        let tables = self.tables.lock().await;
        Ok(oldest_first(
            tables
                .items
                .iter()
                .filter(|i| i.job_id == job_id)
                .cloned()
                .collect(),
        ))
    }

    async fn list_pending_for_job(&self, job_id: JobId) -> Result<Vec<JobItem>, RepositoryError> {
        let tables = self.tables.lock().await;
        Ok(oldest_first(
            tables
                .items
                .iter()
                .filter(|i| i.job_id == job_id && !i.status.is_finished())
                .cloned()
                .collect(),
        ))
    }

    async fn list_queued(&self, limit: usize) -> Result<Vec<JobItem>, RepositoryError> {
        let tables = self.tables.lock().await;
        let mut queued = oldest_first(
            tables
                .items
                .iter()
                .filter(|i| i.status == ItemStatus::Queued)
                .cloned()
                .collect(),
        );
        queued.truncate(limit);
        Ok(queued)
    }

    async fn claim_item(&self, id: JobItemId) -> Result<bool, RepositoryError> {
        let mut tables = self.tables.lock().await;
        match tables.items.iter_mut().find(|i| i.id == id) {
            Some(item) if item.status == ItemStatus::Queued => {
                item.status = ItemStatus::Running;
                Ok(true)
            }
            Some(_) => Ok(false),
            None => Err(RepositoryError::NotFound(id.as_uuid().to_string())),
        }
    }

    async fn update_item(
        &self,
        id: JobItemId,
        outcome: &ItemOutcome,
    ) -> Result<(), RepositoryError> {
        let mut tables = self.tables.lock().await;
        let item = tables
            .items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| RepositoryError::NotFound(id.as_uuid().to_string()))?;
        item.status = outcome.status;
        item.duration_ms = Some(outcome.duration_ms);
        item.result_path = outcome.result_path.clone();
        item.error_message = outcome.error_message.clone();
        Ok(())
    }
}
