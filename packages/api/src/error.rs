//! Standard error response body.

use serde::{Deserialize, Serialize};

/// The JSON body returned for all error responses.
///
/// ```json
/// { "error": "/root/prod is a branch, not a job", "code": "not_leaf" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    /// Human-readable description of the problem.
    pub error: String,

    /// Machine-readable error code.
    ///
    /// | `code` | HTTP status |
    /// |--------|------------|
    /// | `invalid_json` | 400 |
    /// | `not_leaf` | 400 |
    /// | `not_branch` | 400 |
    /// | `not_found` | 404 |
    /// | `invalid_params` | 422 |
    /// | `unknown_job_type` | 422 |
    /// | `internal_error` | 500 |
    pub code: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            error: error.into(),
        }
    }
}

/// Well-known error codes.
pub mod codes {
    pub const INVALID_JSON: &str = "invalid_json";
    pub const NOT_LEAF: &str = "not_leaf";
    pub const NOT_BRANCH: &str = "not_branch";
    pub const NOT_FOUND: &str = "not_found";
    pub const INVALID_PARAMS: &str = "invalid_params";
    pub const UNKNOWN_JOB_TYPE: &str = "unknown_job_type";
    pub const INTERNAL_ERROR: &str = "internal_error";
}
