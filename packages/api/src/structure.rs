//! Bodies of the structural endpoints generated for each node.
//!
//! `GET <branch>/branches` and `GET <branch>/leaves` return bare JSON arrays
//! of [`SubBranchInfo`] and [`LeafInfo`]; they are defined in the core crate
//! and re-exported here.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use spacewalk::{LeafInfo, SubBranchInfo};

/// The response body for `GET <leaf>/post-schema`.
///
/// ```json
/// { "postSchema": { "$schema": "http://json-schema.org/draft-07/schema#", "...": "..." } }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PostSchemaResponse {
    pub post_schema: Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_schema_key_is_camel_case() {
        let body = PostSchemaResponse {
            post_schema: serde_json::json!({ "type": "object" }),
        };
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(json, r#"{"postSchema":{"type":"object"}}"#);
    }
}
