//! Request and response types for the auto-generated Spacewalk API.
//!
//! # Endpoints covered
//!
//! | Method | Path | Type |
//! |--------|------|------|
//! | GET | `/` | → [`ServiceInfo`] |
//! | GET | `<branch>/branches` | → `Vec<`[`SubBranchInfo`]`>` |
//! | GET | `<branch>/leaves` | → `Vec<`[`LeafInfo`]`>` |
//! | GET | `<leaf>/post-schema` | → [`PostSchemaResponse`] |
//! | POST | `<leaf>/job` | JSON object of parameters → [`SubmitResponse`] |
//! | GET | `<root>/progress/{uuid}` | → [`JobProgress`] |
//! | GET | `<root>/info/{uuid}` | → [`JobInfo`] |
//! | GET | `<root>/data/{uuid}` | → JSON object |
//! | GET | `<root>/dump/{uuid}` | → [`JobRecord`] |
//!
//! Every error response is an [`ErrorResponse`].

pub mod error;
pub mod job;
pub mod service;
pub mod structure;

pub use error::ErrorResponse;
pub use job::{JobInfo, JobProgress, JobRecord, JobState, SubmitResponse};
pub use service::ServiceInfo;
pub use structure::{LeafInfo, PostSchemaResponse, SubBranchInfo};
