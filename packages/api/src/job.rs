//! Job submission and lifecycle lookup types.
//!
//! These are the bodies of `POST <leaf>/job` and the four root-relative
//! lookups (`progress`, `info`, `data`, `dump`). Their content is owned by
//! the job-execution engine; the API only fixes the shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// The response body for a successful `POST <leaf>/job` (HTTP 201).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubmitResponse {
    pub uuid: Uuid,
}

/// Where a job is in its lifecycle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Queued,
    Running,
    Complete,
    Failed,
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobState::Queued => write!(f, "queued"),
            JobState::Running => write!(f, "running"),
            JobState::Complete => write!(f, "complete"),
            JobState::Failed => write!(f, "failed"),
        }
    }
}

/// `GET <root>/progress/{uuid}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobProgress {
    pub uuid: Uuid,
    pub state: JobState,
    /// Fraction of work done, `0.0..=1.0`.
    pub completeness: f64,
}

/// `GET <root>/info/{uuid}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobInfo {
    pub uuid: Uuid,
    pub job_type: String,
    pub state: JobState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// `GET <root>/dump/{uuid}`: everything the engine holds for a job.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    pub uuid: Uuid,
    pub job_type: String,
    pub state: JobState,
    pub completeness: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Submission parameters after defaults were applied.
    pub params: Map<String, Value>,
    /// Job output, served by `GET <root>/data/{uuid}`.
    pub data: Map<String, Value>,
}

impl JobRecord {
    pub fn progress(&self) -> JobProgress {
        JobProgress {
            uuid: self.uuid,
            state: self.state,
            completeness: self.completeness,
        }
    }

    pub fn info(&self) -> JobInfo {
        JobInfo {
            uuid: self.uuid,
            job_type: self.job_type.clone(),
            state: self.state,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> JobRecord {
        let now = Utc::now();
        JobRecord {
            uuid: Uuid::now_v7(),
            job_type: "examples_fizz_buzz".into(),
            state: JobState::Queued,
            completeness: 0.0,
            created_at: now,
            updated_at: now,
            params: Map::new(),
            data: Map::new(),
        }
    }

    #[test]
    fn state_serialises_lowercase() {
        assert_eq!(serde_json::to_string(&JobState::Queued).unwrap(), r#""queued""#);
        assert_eq!(JobState::Complete.to_string(), "complete");
    }

    #[test]
    fn record_uses_camel_case_keys() {
        let json = serde_json::to_value(record()).unwrap();
        assert_eq!(json["jobType"], "examples_fizz_buzz");
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn info_and_progress_project_the_record() {
        let r = record();
        assert_eq!(r.info().uuid, r.uuid);
        assert_eq!(r.info().job_type, r.job_type);
        assert_eq!(r.progress().state, JobState::Queued);
    }
}
