//! `spacewalk-server`: serves a job-type tree as an auto-generated REST API.
//!
//! # Quick start
//!
//! ```sh
//! # Built-in demo catalog on the default port:
//! spacewalk-server
//!
//! # Your own catalog, mounted under /api:
//! SPACEWALK_CATALOG=catalogs/examples.toml SPACEWALK_BASE_PATH=/api spacewalk-server
//! ```
//!
//! # Environment variables
//!
//! See [`ServerConfig`] for the full list.

use std::process::ExitCode;

use spacewalk_server::{build_router, load_structure, memory_state, ServerConfig};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "spacewalk_server=info,spacewalk=info,tower_http=debug".into()),
        )
        .init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("invalid configuration: {e}");
            return ExitCode::from(2);
        }
    };

    let structure = match load_structure(&config) {
        Ok(structure) => structure,
        Err(e) => {
            tracing::error!("failed to build job-type tree: {e}");
            return ExitCode::from(2);
        }
    };

    tracing::info!(
        "serving {} job types for {:?}",
        structure.leaf_paths().len(),
        config.service_name
    );
    tracing::info!("job engine: in-memory (jobs are recorded, never executed)");

    let bind_addr = config.bind_addr;
    let app = build_router(memory_state(structure, config));

    let listener = match tokio::net::TcpListener::bind(bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("failed to bind {bind_addr}: {e}");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!("listening on {bind_addr}");

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("server error: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
