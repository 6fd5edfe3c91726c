//! Job lifecycle lookups under the root path: `progress`, `info`, `data`,
//! and `dump`, each keyed by job id.
//!
//! These never consult the path index. An id that does not parse is treated
//! the same as one the engine has never seen.

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;
use spacewalk_api::{JobInfo, JobProgress, JobRecord};
use uuid::Uuid;

use crate::error::AppError;

use super::AppState;

fn parse_uuid(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(format!("no job with uuid {raw}")))
}

/// `GET <root>/progress/{uuid}`
pub async fn progress(
    State(state): State<AppState>,
    Path(uuid): Path<String>,
) -> Result<Json<JobProgress>, AppError> {
    Ok(Json(state.jobs.progress(parse_uuid(&uuid)?).await?))
}

/// `GET <root>/info/{uuid}`
pub async fn info(
    State(state): State<AppState>,
    Path(uuid): Path<String>,
) -> Result<Json<JobInfo>, AppError> {
    Ok(Json(state.jobs.info(parse_uuid(&uuid)?).await?))
}

/// `GET <root>/data/{uuid}`
pub async fn data(
    State(state): State<AppState>,
    Path(uuid): Path<String>,
) -> Result<Json<Value>, AppError> {
    Ok(Json(state.jobs.data(parse_uuid(&uuid)?).await?))
}

/// `GET <root>/dump/{uuid}`
pub async fn dump(
    State(state): State<AppState>,
    Path(uuid): Path<String>,
) -> Result<Json<JobRecord>, AppError> {
    Ok(Json(state.jobs.dump(parse_uuid(&uuid)?).await?))
}
