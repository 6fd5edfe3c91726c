//! Service discovery handler: `GET /`.

use axum::{extract::State, Json};
use spacewalk_api::ServiceInfo;

use super::AppState;

/// `GET /`
///
/// Reports the service name and where the tree starts, so clients can walk
/// it from `<root>/branches` without knowing any path in advance.
pub async fn info(State(state): State<AppState>) -> Json<ServiceInfo> {
    let structure = &state.structure;
    Json(ServiceInfo {
        service: state.config.service_name.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        root: structure.root_path().to_string(),
        branches: structure.branch_paths().len(),
        leaves: structure.leaf_paths().len(),
    })
}
