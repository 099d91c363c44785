use std::fmt;

use super::job::{JobId, JobItemId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePath(String);

impl StoragePath {
    /// `{job_id}/{item_id}.json`
    pub fn item_result(job_id: &JobId, item_id: &JobItemId) -> Self {
        Self(format!("{}/{}.json", job_id.as_uuid(), item_id.as_uuid()))
    }

    /// Object keys are relative; leading slashes are dropped.
    pub fn from_raw(path: impl Into<String>) -> Self {
        let path = path.into();
        if path.starts_with('/') {
            Self(path.trim_start_matches('/').to_string())
        } else {
            Self(path)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoragePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
