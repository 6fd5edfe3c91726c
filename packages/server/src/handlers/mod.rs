//! HTTP request handlers for every generated Spacewalk endpoint.
//!
//! Structural handlers are mounted once per node path; they recover the node
//! path from the route they were matched on and answer from the
//! [`Structure`]. Job lifecycle handlers delegate to the [`JobEngine`].

pub mod jobs;
pub mod service;
pub mod structure;

use std::sync::Arc;

use spacewalk::Structure;

use crate::{config::ServerConfig, jobs::JobEngine};

/// Shared application state threaded through all Axum handlers via [`axum::extract::State`].
#[derive(Clone)]
pub struct AppState {
    pub structure: Arc<Structure>,
    pub jobs: Arc<dyn JobEngine>,
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(structure: Arc<Structure>, jobs: Arc<dyn JobEngine>, config: ServerConfig) -> Self {
        Self {
            structure,
            jobs,
            config,
        }
    }
}
