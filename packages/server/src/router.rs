//! Assembles the Axum [`Router`] from the generated route table.

use axum::{
    routing::{get, post, MethodRouter},
    Router,
};
use spacewalk::{build_routes, EndpointKind, Structure};
use tower_http::trace::TraceLayer;

use crate::handlers::{jobs, service, structure, AppState};

fn handler(kind: EndpointKind) -> MethodRouter<AppState> {
    match kind {
        EndpointKind::SubBranches => get(structure::sub_branches),
        EndpointKind::Leaves => get(structure::leaves),
        EndpointKind::PostSchema => get(structure::post_schema),
        EndpointKind::RunJob => post(structure::run_job),
        EndpointKind::Progress => get(jobs::progress),
        EndpointKind::Info => get(jobs::info),
        EndpointKind::Data => get(jobs::data),
        EndpointKind::Dump => get(jobs::dump),
    }
}

/// One route per entry of the structure's route table, without state.
pub fn routes(structure: &Structure) -> Router<AppState> {
    build_routes(structure)
        .into_iter()
        .fold(Router::new(), |router, route| {
            tracing::debug!("mounted {} {}", route.method(), route.pattern);
            router.route(&route.pattern, handler(route.kind))
        })
}

/// Build the complete application router with shared state.
pub fn build_router(state: AppState) -> Router {
    let router = routes(&state.structure).route("/", get(service::info));
    tracing::info!(
        service = %state.config.service_name,
        root = state.structure.root_path(),
        "router built"
    );
    router.with_state(state).layer(TraceLayer::new_for_http())
}
