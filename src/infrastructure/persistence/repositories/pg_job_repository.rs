use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;

use crate::application::ports::{JobRepository, RepositoryError};
use crate::domain::{
    ItemOutcome, ItemStatus, Job, JobId, JobItem, JobItemId, JobProgress, JobStatus,
};

const ITEM_COLUMNS: &str = "id, job_id, file_name, file_path, schema, status, duration_ms, \
                            result_path, error_message, created_at";

pub struct PgJobRepository {
    pool: PgPool,
}

impl PgJobRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[instrument(skip(self, job), fields(job_id = %job.id.as_uuid()))]
    pub async fn insert_job(&self, job: &Job) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO jobs (id, status, total_count, done_count, error_count, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(job.id.as_uuid())
        .bind(job.status.as_str())
        .bind(job.total_count)
        .bind(job.done_count)
        .bind(job.error_count)
        .bind(job.created_at)
        .bind(job.updated_at)
        .execute(&self.pool)
        .await
        .map_err(query_failed)?;
        Ok(())
    }

    #[instrument(skip(self, item), fields(item_id = %item.id.as_uuid()))]
    pub async fn insert_item(&self, item: &JobItem) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO job_items (id, job_id, file_name, file_path, schema, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(item.id.as_uuid())
        .bind(item.job_id.as_uuid())
        .bind(&item.file_name)
        .bind(&item.file_path)
        .bind(&item.schema)
        .bind(item.status.as_str())
        .bind(item.created_at)
        .execute(&self.pool)
        .await
        .map_err(query_failed)?;
        Ok(())
    }
}

fn query_failed(e: sqlx::Error) -> RepositoryError {
    RepositoryError::QueryFailed(e.to_string())
}

fn job_from_row(row: &PgRow) -> Result<Job, RepositoryError> {
    let status: String = row.try_get("status").map_err(query_failed)?;
    Ok(Job {
        id: JobId::from_uuid(row.try_get("id").map_err(query_failed)?),
        status: status
            .parse::<JobStatus>()
            .map_err(RepositoryError::QueryFailed)?,
        total_count: row.try_get("total_count").map_err(query_failed)?,
        done_count: row.try_get("done_count").map_err(query_failed)?,
        error_count: row.try_get("error_count").map_err(query_failed)?,
        created_at: row.try_get("created_at").map_err(query_failed)?,
        updated_at: row.try_get("updated_at").map_err(query_failed)?,
    })
}

fn item_from_row(row: &PgRow) -> Result<JobItem, RepositoryError> {
    let status: String = row.try_get("status").map_err(query_failed)?;
    Ok(JobItem {
        id: JobItemId::from_uuid(row.try_get("id").map_err(query_failed)?),
        job_id: JobId::from_uuid(row.try_get("job_id").map_err(query_failed)?),
        file_name: row.try_get("file_name").map_err(query_failed)?,
        file_path: row.try_get("file_path").map_err(query_failed)?,
        schema: row.try_get("schema").map_err(query_failed)?,
        status: status
            .parse::<ItemStatus>()
            .map_err(RepositoryError::QueryFailed)?,
        duration_ms: row.try_get("duration_ms").map_err(query_failed)?,
        result_path: row.try_get("result_path").map_err(query_failed)?,
        error_message: row.try_get("error_message").map_err(query_failed)?,
        created_at: row.try_get("created_at").map_err(query_failed)?,
    })
}

#[async_trait]
impl JobRepository for PgJobRepository {
    #[instrument(skip(self), fields(job_id = %id.as_uuid()))]
    async fn get_job(&self, id: JobId) -> Result<Option<Job>, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT id, status, total_count, done_count, error_count, created_at, updated_at
            FROM jobs
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(query_failed)?;

        row.as_ref().map(job_from_row).transpose()
    }

    #[instrument(skip(self), fields(job_id = %id.as_uuid()))]
    async fn mark_job_running(&self, id: JobId) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            UPDATE jobs
            SET status = $1, updated_at = $2
            WHERE id = $3 AND status = $4
            "#,
        )
        .bind(JobStatus::Running.as_str())
        .bind(Utc::now())
        .bind(id.as_uuid())
        .bind(JobStatus::Queued.as_str())
        .execute(&self.pool)
        .await
        .map_err(query_failed)?;
        Ok(())
    }

    #[instrument(skip(self), fields(job_id = %id.as_uuid(), status = %progress.status))]
    async fn update_job_progress(
        &self,
        id: JobId,
        progress: JobProgress,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            UPDATE jobs
            SET total_count = $1, done_count = $2, error_count = $3, status = $4, updated_at = $5
            WHERE id = $6
            "#,
        )
        .bind(progress.total)
        .bind(progress.done)
        .bind(progress.error)
        .bind(progress.status.as_str())
        .bind(Utc::now())
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(query_failed)?;
        Ok(())
    }

    #[instrument(skip(self), fields(job_id = %job_id.as_uuid()))]
    async fn items_for_job(&self, job_id: JobId) -> Result<Vec<JobItem>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {ITEM_COLUMNS} FROM job_items WHERE job_id = $1 ORDER BY created_at ASC"
        ))
        .bind(job_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(query_failed)?;

        rows.iter().map(item_from_row).collect()
    }

    #[instrument(skip(self), fields(job_id = %job_id.as_uuid()))]
    async fn list_pending_for_job(&self, job_id: JobId) -> Result<Vec<JobItem>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {ITEM_COLUMNS} FROM job_items \
             WHERE job_id = $1 AND status NOT IN ('done', 'error') \
             ORDER BY created_at ASC"
        ))
        .bind(job_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(query_failed)?;

        rows.iter().map(item_from_row).collect()
    }

    #[instrument(skip(self))]
    async fn list_queued(&self, limit: usize) -> Result<Vec<JobItem>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {ITEM_COLUMNS} FROM job_items \
             WHERE status = 'queued' ORDER BY created_at ASC LIMIT $1"
        ))
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(query_failed)?;

        rows.iter().map(item_from_row).collect()
    }

    #[instrument(skip(self), fields(item_id = %id.as_uuid()))]
    async fn claim_item(&self, id: JobItemId) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE job_items
            SET status = 'running'
            WHERE id = $1 AND status = 'queued'
            "#,
        )
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(query_failed)?;

        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self, outcome), fields(item_id = %id.as_uuid(), status = %outcome.status))]
    async fn update_item(
        &self,
        id: JobItemId,
        outcome: &ItemOutcome,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE job_items
            SET status = $1, duration_ms = $2, result_path = $3, error_message = $4
            WHERE id = $5
            "#,
        )
        .bind(outcome.status.as_str())
        .bind(outcome.duration_ms)
        .bind(&outcome.result_path)
        .bind(&outcome.error_message)
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(query_failed)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(id.as_uuid().to_string()));
        }
        Ok(())
    }
}
