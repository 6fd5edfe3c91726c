//! Job-execution engine abstraction.
//!
//! The HTTP layer never runs jobs itself. `POST <leaf>/job` hands the leaf's
//! job type and the submitted parameters to a [`JobEngine`], and the four
//! lifecycle lookups under the root path read back whatever the engine holds.
//!
//! # Implementations
//!
//! | Type | When to use |
//! |------|-------------|
//! | [`MemoryJobEngine`] | Tests, the conformance suite, the demo server |
//!
//! [`MemoryJobEngine`]: memory::MemoryJobEngine

pub mod memory;
pub mod params;

use async_trait::async_trait;
use serde_json::Value;
use spacewalk_api::{JobInfo, JobProgress, JobRecord};
use uuid::Uuid;

pub use memory::MemoryJobEngine;

// ---------------------------------------------------------------------------
// JobError
// ---------------------------------------------------------------------------

/// Errors that job engine operations can return.
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    /// No job with this id has been submitted.
    #[error("no job with uuid {0}")]
    NotFound(Uuid),

    /// The engine has no registration for the job type.
    #[error("job type {0:?} is not registered with the job engine")]
    UnknownJobType(String),

    /// The submitted parameters do not satisfy the job type's schema.
    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    /// An unexpected error inside the engine.
    #[error("internal job engine error: {0}")]
    Internal(String),
}

// ---------------------------------------------------------------------------
// JobEngine trait
// ---------------------------------------------------------------------------

/// The contract every job-execution backend must satisfy.
///
/// Implementations must be `Send + Sync` so they can be shared across Axum
/// handler tasks via `Arc<dyn JobEngine>`.
#[async_trait]
pub trait JobEngine: Send + Sync + 'static {
    /// Accept a job of `job_type` with the given JSON parameters.
    ///
    /// Returns the new job's id.
    async fn submit(&self, job_type: &str, params: &Value) -> Result<Uuid, JobError>;

    async fn progress(&self, uuid: Uuid) -> Result<JobProgress, JobError>;

    async fn info(&self, uuid: Uuid) -> Result<JobInfo, JobError>;

    /// The job's output document.
    async fn data(&self, uuid: Uuid) -> Result<Value, JobError>;

    /// Everything the engine holds for the job.
    async fn dump(&self, uuid: Uuid) -> Result<JobRecord, JobError>;
}
