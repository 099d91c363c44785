use crate::domain::{ItemOutcome, Job, JobId, JobItem, JobItemId, JobProgress};
use async_trait::async_trait;

use super::RepositoryError;

#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn get_job(&self, id: JobId) -> Result<Option<Job>, RepositoryError>;

    /// Flips a `queued` job to `running`; no-op for any other status.
    async fn mark_job_running(&self, id: JobId) -> Result<(), RepositoryError>;

    async fn update_job_progress(
        &self,
        id: JobId,
        progress: JobProgress,
    ) -> Result<(), RepositoryError>;

    async fn items_for_job(&self, job_id: JobId) -> Result<Vec<JobItem>, RepositoryError>;

    /// Items of a job that are neither done nor failed, oldest first.
    async fn list_pending_for_job(&self, job_id: JobId) -> Result<Vec<JobItem>, RepositoryError>;

    async fn list_queued(&self, limit: usize) -> Result<Vec<JobItem>, RepositoryError>;

    /// Optimistic `queued` → `running` transition. `false` when another
    /// worker got there first.
    async fn claim_item(&self, id: JobItemId) -> Result<bool, RepositoryError>;

    async fn update_item(&self, id: JobItemId, outcome: &ItemOutcome)
    -> Result<(), RepositoryError>;
}
