//! Server configuration, populated from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;

use spacewalk::is_path_segment;
use thiserror::Error;

/// Errors raised when an environment variable holds an unusable value.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("SPACEWALK_BIND must be a valid socket address (e.g. 0.0.0.0:8888), got {0:?}")]
    InvalidBind(String),

    #[error(
        "SPACEWALK_BASE_PATH must be empty or '/'-separated segments of ASCII letters, \
         digits, '-', '_', '.', and '~' (e.g. /api/v1), got {0:?}"
    )]
    InvalidBasePath(String),
}

/// Runtime configuration for a Spacewalk server.
///
/// All fields are populated from environment variables with defaults, so the
/// server starts with zero configuration and serves the built-in demo catalog.
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | `SPACEWALK_BIND` | `0.0.0.0:8888` | TCP socket address to listen on |
/// | `SPACEWALK_BASE_PATH` | (empty) | Prefix for the root branch path, e.g. `/api` |
/// | `SPACEWALK_SERVICE` | `spacewalk` | Service name reported by `GET /` |
/// | `SPACEWALK_CATALOG` | (absent = demo catalog) | JSON or TOML catalog file |
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address the server binds to.
    pub bind_addr: SocketAddr,

    /// Prepended to the root branch's path. Empty means the root sits
    /// directly under `/`.
    pub base_path: String,

    /// Human-readable service name.
    pub service_name: String,

    /// Catalog file to build the tree from. `None` serves the demo catalog.
    pub catalog_path: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8888)),
            base_path: String::new(),
            service_name: "spacewalk".into(),
            catalog_path: None,
        }
    }
}

impl ServerConfig {
    /// Populate config from environment variables, applying defaults where absent.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let bind_addr = match lookup("SPACEWALK_BIND") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidBind(raw))?,
            None => defaults.bind_addr,
        };

        let base_path = lookup("SPACEWALK_BASE_PATH").unwrap_or_default();
        if !is_base_path(&base_path) {
            return Err(ConfigError::InvalidBasePath(base_path));
        }

        Ok(Self {
            bind_addr,
            base_path,
            service_name: lookup("SPACEWALK_SERVICE").unwrap_or(defaults.service_name),
            catalog_path: lookup("SPACEWALK_CATALOG").map(PathBuf::from),
        })
    }
}

/// Empty, or one or more `/<segment>` components where every segment is a
/// valid path segment. Anything else could not be mounted as a static route.
fn is_base_path(path: &str) -> bool {
    if path.is_empty() {
        return true;
    }
    path.strip_prefix('/')
        .is_some_and(|rest| rest.split('/').all(is_path_segment))
}
