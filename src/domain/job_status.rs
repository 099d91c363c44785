use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Lifecycle of a single document inside a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Queued,
    Running,
    Done,
    Error,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Queued => "queued",
            ItemStatus::Running => "running",
            ItemStatus::Done => "done",
            ItemStatus::Error => "error",
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, ItemStatus::Done | ItemStatus::Error)
    }
}

impl FromStr for ItemStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "queued" => Ok(ItemStatus::Queued),
            "running" => Ok(ItemStatus::Running),
            "done" => Ok(ItemStatus::Done),
            "error" => Ok(ItemStatus::Error),
            _ => Err(format!("Invalid item status: {}", s)),
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Aggregate status of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Running,
    Done,
    Error,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Running => "running",
            JobStatus::Done => "done",
            JobStatus::Error => "error",
        }
    }

    /// `done` iff every item is done, else `error` if any item failed,
    /// else `running`.
    pub fn aggregate<'a, I>(items: I) -> Self
    where
        I: IntoIterator<Item = &'a ItemStatus>,
    {
        let mut all_done = true;
        let mut any_error = false;
        for status in items {
            all_done &= *status == ItemStatus::Done;
            any_error |= *status == ItemStatus::Error;
        }
        if all_done {
            JobStatus::Done
        } else if any_error {
            JobStatus::Error
        } else {
            JobStatus::Running
        }
    }
}

impl FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "queued" => Ok(JobStatus::Queued),
            "running" => Ok(JobStatus::Running),
            "done" => Ok(JobStatus::Done),
            "error" => Ok(JobStatus::Error),
            _ => Err(format!("Invalid job status: {}", s)),
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
