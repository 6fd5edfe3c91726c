//! Application-level error type returned by handlers.
//!
//! All variants serialise to the [`ErrorResponse`] JSON format and map to the
//! appropriate HTTP status code.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use spacewalk::StructureError;
use spacewalk_api::{error::codes, ErrorResponse};

use crate::jobs::JobError;

/// An error that a handler can return; converts directly to an HTTP response.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    NotLeaf(String),
    NotBranch(String),
    InvalidJson(String),
    InvalidParams(String),
    UnknownJobType(String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, codes::NOT_FOUND, msg),
            AppError::NotLeaf(msg) => (StatusCode::BAD_REQUEST, codes::NOT_LEAF, msg),
            AppError::NotBranch(msg) => (StatusCode::BAD_REQUEST, codes::NOT_BRANCH, msg),
            AppError::InvalidJson(msg) => (StatusCode::BAD_REQUEST, codes::INVALID_JSON, msg),
            AppError::InvalidParams(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, codes::INVALID_PARAMS, msg)
            }
            AppError::UnknownJobType(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, codes::UNKNOWN_JOB_TYPE, msg)
            }
            AppError::Internal(msg) => {
                tracing::error!("internal error: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, codes::INTERNAL_ERROR, msg)
            }
        };
        let body = ErrorResponse::new(code, message);
        (status, Json(body)).into_response()
    }
}

impl From<StructureError> for AppError {
    fn from(e: StructureError) -> Self {
        let msg = e.to_string();
        match e {
            StructureError::NotFound(_) => AppError::NotFound(msg),
            StructureError::NotLeaf(_) => AppError::NotLeaf(msg),
            StructureError::NotBranch(_) => AppError::NotBranch(msg),
        }
    }
}

impl From<JobError> for AppError {
    fn from(e: JobError) -> Self {
        let msg = e.to_string();
        match e {
            JobError::NotFound(_) => AppError::NotFound(msg),
            JobError::UnknownJobType(_) => AppError::UnknownJobType(msg),
            JobError::InvalidParams(_) => AppError::InvalidParams(msg),
            JobError::Internal(_) => AppError::Internal(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structure_errors_map_to_status() {
        let cases = [
            (StructureError::NotFound("/x".into()), StatusCode::NOT_FOUND),
            (StructureError::NotLeaf("/x".into()), StatusCode::BAD_REQUEST),
            (StructureError::NotBranch("/x".into()), StatusCode::BAD_REQUEST),
        ];
        for (err, status) in cases {
            assert_eq!(AppError::from(err).into_response().status(), status);
        }
    }

    #[test]
    fn job_errors_map_to_status() {
        let uuid = uuid::Uuid::now_v7();
        let cases = [
            (JobError::NotFound(uuid), StatusCode::NOT_FOUND),
            (JobError::UnknownJobType("t".into()), StatusCode::UNPROCESSABLE_ENTITY),
            (JobError::InvalidParams("p".into()), StatusCode::UNPROCESSABLE_ENTITY),
            (JobError::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(AppError::from(err).into_response().status(), status);
        }
    }
}
