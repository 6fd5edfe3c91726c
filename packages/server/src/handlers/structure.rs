//! Structural handlers: `branches`, `leaves`, `post-schema`, and `job`.
//!
//! The same handler function is mounted at every node path. Each one strips
//! its resource suffix from the matched route pattern to recover the node
//! path, then looks the node up in the path index. A path the index does not
//! know answers 404; a branch where a leaf is required answers 400.

use axum::{
    body::Bytes,
    extract::{MatchedPath, State},
    http::StatusCode,
    Json,
};
use serde_json::{Map, Value};
use spacewalk::{routes, EndpointKind, LeafInfo, SubBranchInfo};
use spacewalk_api::{PostSchemaResponse, SubmitResponse};

use crate::error::AppError;

use super::AppState;

fn node_path(matched: &MatchedPath, kind: EndpointKind) -> Result<&str, AppError> {
    routes::node_path(matched.as_str(), kind).ok_or_else(|| {
        AppError::Internal(format!(
            "route {} is not a {} route",
            matched.as_str(),
            kind.resource()
        ))
    })
}

// ---------------------------------------------------------------------------
// Branch endpoints
// ---------------------------------------------------------------------------

/// `GET <branch>/branches`
pub async fn sub_branches(
    State(state): State<AppState>,
    matched: MatchedPath,
) -> Result<Json<Vec<SubBranchInfo>>, AppError> {
    let path = node_path(&matched, EndpointKind::SubBranches)?;
    Ok(Json(state.structure.sub_branches(path)?))
}

/// `GET <branch>/leaves`
pub async fn leaves(
    State(state): State<AppState>,
    matched: MatchedPath,
) -> Result<Json<Vec<LeafInfo>>, AppError> {
    let path = node_path(&matched, EndpointKind::Leaves)?;
    Ok(Json(state.structure.leaves(path)?))
}

// ---------------------------------------------------------------------------
// Leaf endpoints
// ---------------------------------------------------------------------------

/// `GET <leaf>/post-schema`
pub async fn post_schema(
    State(state): State<AppState>,
    matched: MatchedPath,
) -> Result<Json<PostSchemaResponse>, AppError> {
    let path = node_path(&matched, EndpointKind::PostSchema)?;
    let schema = state.structure.post_schema(path)?;
    Ok(Json(PostSchemaResponse {
        post_schema: schema.clone(),
    }))
}

/// `POST <leaf>/job`: submit a job of the leaf's job type.
///
/// The body is a JSON object of parameters; an empty body submits `{}`.
/// Returns HTTP 201 with the id the job engine assigned.
pub async fn run_job(
    State(state): State<AppState>,
    matched: MatchedPath,
    body: Bytes,
) -> Result<(StatusCode, Json<SubmitResponse>), AppError> {
    let path = node_path(&matched, EndpointKind::RunJob)?;
    let job_type = state.structure.job_type(path)?;

    let params = if body.is_empty() {
        Value::Object(Map::new())
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| AppError::InvalidJson(format!("request body is not valid JSON: {e}")))?
    };

    let uuid = state.jobs.submit(job_type, &params).await.map_err(|e| {
        tracing::warn!(path, job_type, "job rejected: {e}");
        AppError::from(e)
    })?;

    Ok((StatusCode::CREATED, Json(SubmitResponse { uuid })))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
