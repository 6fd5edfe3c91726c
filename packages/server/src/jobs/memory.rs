//! In-memory job engine.
//!
//! Records every accepted submission behind a [`RwLock`] and never executes
//! anything: jobs stay `queued` until the process exits. Use this for tests,
//! the conformance suite, and the demo server.
//!
//! Jobs are stored in a [`BTreeMap`] keyed by UUIDv7, so iteration order is
//! submission order.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use spacewalk::{JobTypeDescriptor, ParamSchema, Structure};
use spacewalk_api::{JobInfo, JobProgress, JobRecord, JobState};
use uuid::Uuid;

use super::params::load_params;
use super::{JobEngine, JobError};

// ---------------------------------------------------------------------------
// Registered job types
// ---------------------------------------------------------------------------

struct Registration {
    params: ParamSchema,
    /// Initial output document: every base field with a default.
    initial_data: Map<String, Value>,
}

impl Registration {
    fn from_descriptor(descriptor: &JobTypeDescriptor) -> Self {
        let initial_data = descriptor
            .base_fields()
            .fields()
            .filter(|(name, _)| descriptor.params.get(name).is_none())
            .filter_map(|(name, field)| Some((name.to_string(), field.default.clone()?)))
            .collect();
        Self {
            params: descriptor.params.clone(),
            initial_data,
        }
    }
}

// ---------------------------------------------------------------------------
// MemoryJobEngine
// ---------------------------------------------------------------------------

/// Thread-safe, in-memory implementation of [`JobEngine`].
pub struct MemoryJobEngine {
    types: HashMap<String, Registration>,
    jobs: RwLock<BTreeMap<Uuid, JobRecord>>,
}

impl MemoryJobEngine {
    pub fn new() -> Self {
        Self {
            types: HashMap::new(),
            jobs: RwLock::new(BTreeMap::new()),
        }
    }

    /// An engine that accepts every job type runnable in `structure`.
    pub fn for_structure(structure: &Structure) -> Self {
        let mut engine = Self::new();
        for descriptor in structure.job_types() {
            engine.register(descriptor);
        }
        engine
    }

    /// Accept submissions for the descriptor's job type. Registering the
    /// same job type twice replaces the earlier registration.
    pub fn register(&mut self, descriptor: &JobTypeDescriptor) {
        tracing::debug!(job_type = %descriptor.job_type, "job type registered");
        self.types.insert(
            descriptor.job_type.clone(),
            Registration::from_descriptor(descriptor),
        );
    }

    /// Number of jobs submitted so far.
    pub fn job_count(&self) -> usize {
        self.jobs.read().unwrap_or_else(|p| p.into_inner()).len()
    }

    fn with_job<T>(&self, uuid: Uuid, f: impl FnOnce(&JobRecord) -> T) -> Result<T, JobError> {
        let jobs = self.jobs.read().unwrap_or_else(|p| p.into_inner());
        jobs.get(&uuid).map(f).ok_or(JobError::NotFound(uuid))
    }
}

impl Default for MemoryJobEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl JobEngine for MemoryJobEngine {
    async fn submit(&self, job_type: &str, params: &Value) -> Result<Uuid, JobError> {
        let registration = self
            .types
            .get(job_type)
            .ok_or_else(|| JobError::UnknownJobType(job_type.to_string()))?;
        let params = load_params(&registration.params, params)?;

        let now = Utc::now();
        let record = JobRecord {
            uuid: Uuid::now_v7(),
            job_type: job_type.to_string(),
            state: JobState::Queued,
            completeness: 0.0,
            created_at: now,
            updated_at: now,
            params,
            data: registration.initial_data.clone(),
        };
        let uuid = record.uuid;

        self.jobs
            .write()
            .unwrap_or_else(|p| p.into_inner())
            .insert(uuid, record);
        tracing::info!(%uuid, job_type, "job queued");
        Ok(uuid)
    }

    async fn progress(&self, uuid: Uuid) -> Result<JobProgress, JobError> {
        self.with_job(uuid, JobRecord::progress)
    }

    async fn info(&self, uuid: Uuid) -> Result<JobInfo, JobError> {
        self.with_job(uuid, JobRecord::info)
    }

    async fn data(&self, uuid: Uuid) -> Result<Value, JobError> {
        self.with_job(uuid, |r| Value::Object(r.data.clone()))
    }

    async fn dump(&self, uuid: Uuid) -> Result<JobRecord, JobError> {
        self.with_job(uuid, JobRecord::clone)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
