//! Public surface for the `spacewalk-server` crate.
//!
//! Exposes the router builder, config, and job engine types so that external
//! crates (e.g. the conformance test suite) can spin up an in-process server
//! without spawning a subprocess.

pub mod config;
pub mod demo;
pub mod error;
pub mod handlers;
pub mod jobs;
pub mod router;

use std::sync::Arc;

use spacewalk::{Catalog, CatalogError, Structure};

pub use config::{ConfigError, ServerConfig};
pub use handlers::AppState;
pub use jobs::{JobEngine, JobError, MemoryJobEngine};
pub use router::build_router;

/// Load the configured catalog (or the demo catalog) and build its structure
/// under the configured base path.
pub fn load_structure(config: &ServerConfig) -> Result<Structure, CatalogError> {
    let catalog = match &config.catalog_path {
        Some(path) => {
            tracing::info!("catalog: {}", path.display());
            Catalog::load(path)?
        }
        None => {
            tracing::info!("catalog: built-in demo");
            demo::catalog()?
        }
    };
    catalog.build(&config.base_path)
}

/// Application state over `structure` with a fresh [`MemoryJobEngine`].
pub fn memory_state(structure: Structure, config: ServerConfig) -> AppState {
    let jobs = Arc::new(MemoryJobEngine::for_structure(&structure));
    AppState::new(Arc::new(structure), jobs, config)
}
