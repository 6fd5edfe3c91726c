//! Service discovery: `GET /`.

use serde::{Deserialize, Serialize};

/// Describes a running Spacewalk service and where its tree starts.
///
/// ```json
/// {
///   "service": "spacewalk",
///   "version": "0.1.0",
///   "root": "/examples",
///   "branches": 1,
///   "leaves": 2
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceInfo {
    /// Operator-chosen service name.
    pub service: String,

    /// Version of the server implementation.
    pub version: String,

    /// Path of the root branch. Every generated endpoint lives under it.
    pub root: String,

    /// Number of branches in the tree, root included.
    pub branches: usize,

    /// Number of runnable leaves.
    pub leaves: usize,
}
