//! Remote parsing job as reported by the service

use serde::{Deserialize, Serialize};
use std::fmt;

/// Job status
///
/// `Pending` is the only non-terminal status; the client never writes it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Pending,
    Success,
    Error,
    Canceled,
}

impl JobStatus {
    /// Whether no further transition can happen
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobStatus::Pending)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "PENDING",
            JobStatus::Success => "SUCCESS",
            JobStatus::Error => "ERROR",
            JobStatus::Canceled => "CANCELED",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of the upload and job status endpoints: `{status, id}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Job {
    pub id: String,
    pub status: JobStatus,
}

impl Job {
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_status_body() {
        let job: Job =
            serde_json::from_str(r#"{"id": "c0ffee", "status": "PENDING"}"#).unwrap();
        assert_eq!(job.id, "c0ffee");
        assert_eq!(job.status, JobStatus::Pending);
        assert!(!job.is_terminal());
    }

    #[test]
    fn test_terminal_statuses() {
        for (raw, status) in [
            ("SUCCESS", JobStatus::Success),
            ("ERROR", JobStatus::Error),
            ("CANCELED", JobStatus::Canceled),
        ] {
            let job: Job =
                serde_json::from_value(serde_json::json!({"id": "x", "status": raw})).unwrap();
            assert_eq!(job.status, status);
            assert!(job.is_terminal());
            assert_eq!(status.to_string(), raw);
        }
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let parsed = serde_json::from_str::<Job>(r#"{"id": "x", "status": "RUNNING"}"#);
        assert!(parsed.is_err());
    }
}
