use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

use super::job_status::{ItemStatus, JobStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JobId(Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JobItemId(Uuid);

impl JobItemId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for JobItemId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct Job {
    pub id: JobId,
    pub status: JobStatus,
    pub total_count: i64,
    pub done_count: i64,
    pub error_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: JobId::new(),
            status: JobStatus::Queued,
            total_count: 0,
            done_count: 0,
            error_count: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Default for Job {
    fn default() -> Self {
        Self::new()
    }
}

/// One document queued for extraction. `schema` is kept raw because
/// producers store it either as an object or as a JSON string.
#[derive(Debug, Clone)]
pub struct JobItem {
    pub id: JobItemId,
    pub job_id: JobId,
    pub file_name: String,
    pub file_path: String,
    pub schema: Value,
    pub status: ItemStatus,
    pub duration_ms: Option<i64>,
    pub result_path: Option<String>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl JobItem {
    pub fn new(job_id: JobId, file_name: String, file_path: String, schema: Value) -> Self {
        Self {
            id: JobItemId::new(),
            job_id,
            file_name,
            file_path,
            schema,
            status: ItemStatus::Queued,
            duration_ms: None,
            result_path: None,
            error_message: None,
            created_at: Utc::now(),
        }
    }
}

/// Terminal patch applied to an item after processing.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemOutcome {
    pub status: ItemStatus,
    pub duration_ms: i64,
    pub result_path: Option<String>,
    pub error_message: Option<String>,
}

impl ItemOutcome {
    pub fn done(duration_ms: i64, result_path: String) -> Self {
        Self {
            status: ItemStatus::Done,
            duration_ms,
            result_path: Some(result_path),
            error_message: None,
        }
    }

    pub fn failed(duration_ms: i64, message: String) -> Self {
        Self {
            status: ItemStatus::Error,
            duration_ms,
            result_path: None,
            error_message: Some(message),
        }
    }
}

/// Recounted job totals written back after each item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobProgress {
    pub total: i64,
    pub done: i64,
    pub error: i64,
    pub status: JobStatus,
}

impl JobProgress {
    pub fn from_items(statuses: &[ItemStatus]) -> Self {
        let count = |s: ItemStatus| statuses.iter().filter(|&&x| x == s).count() as i64;
        Self {
            total: statuses.len() as i64,
            done: count(ItemStatus::Done),
            error: count(ItemStatus::Error),
            status: JobStatus::aggregate(statuses),
        }
    }
}
