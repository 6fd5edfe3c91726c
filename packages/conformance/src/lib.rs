//! Shared helpers for the Spacewalk conformance test suite.
//!
//! Provides [`spawn_server`], which binds a `TcpListener` on an ephemeral
//! port, wires up an in-process server over a catalog backed by
//! `MemoryJobEngine`, and returns the local URL plus the engine so tests can
//! inspect recorded jobs without going through the HTTP layer.

use std::sync::Arc;

use spacewalk::Catalog;
use spacewalk_server::{build_router, AppState, JobEngine, MemoryJobEngine, ServerConfig};

/// The catalog the conformance tests run against:
///
/// ```text
/// /root
///   /root/prod      useful (thingum), also-useful, super-useful, empty-branch/
///   /root/dev       might-be-useful, needs-testing, exp/
///   /root/dev/exp   new-thing, crazy
/// ```
pub const FIXTURE_CATALOG: &str = include_str!("../../../catalogs/fixture.json");

/// Start an ephemeral in-process server over [`FIXTURE_CATALOG`].
///
/// See [`spawn_server_with`].
pub async fn spawn_server() -> (String, Arc<MemoryJobEngine>) {
    spawn_server_with(FIXTURE_CATALOG, "").await
}

/// Start an ephemeral in-process server over `catalog_json` with every path
/// under `base_path`, and return `(base_url, engine)`.
///
/// The server runs in a background `tokio` task and is bound to an
/// OS-assigned port on `127.0.0.1`. The returned `String` is the full base
/// URL, e.g. `http://127.0.0.1:51234`.
///
/// # Panics
///
/// Panics if the catalog does not build or the TCP listener cannot be bound.
pub async fn spawn_server_with(
    catalog_json: &str,
    base_path: &str,
) -> (String, Arc<MemoryJobEngine>) {
    let structure = Catalog::from_json(catalog_json)
        .and_then(|c| c.build(base_path))
        .expect("build conformance catalog");

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("get local addr");
    let base_url = format!("http://{addr}");

    let engine = Arc::new(MemoryJobEngine::for_structure(&structure));
    let jobs: Arc<dyn JobEngine> = Arc::clone(&engine) as Arc<dyn JobEngine>;

    let config = ServerConfig {
        bind_addr: addr,
        base_path: base_path.into(),
        service_name: "testService".into(),
        catalog_path: None,
    };
    let router = build_router(AppState::new(Arc::new(structure), jobs, config));

    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("conformance server error");
    });

    (base_url, engine)
}
