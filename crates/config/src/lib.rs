//! Planforge configuration structures to map the planforge.toml configuration.

#![deny(missing_docs)]

mod auth;
mod cors;
mod database;
mod health;
mod llm;
mod loader;
mod tls;

use std::{net::SocketAddr, path::Path};

pub use auth::AuthConfig;
pub use cors::{AnyOrUrlArray, CorsConfig};
pub use database::DatabaseConfig;
pub use health::HealthConfig;
pub use llm::{GoogleConfig, LlmConfig};
use serde::Deserialize;
pub use tls::TlsServerConfig;

/// Main configuration structure for the Planforge application.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// HTTP server configuration settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Plan generation (LLM) configuration settings.
    #[serde(default)]
    pub llm: LlmConfig,
    /// Database configuration settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Auth service configuration settings.
    #[serde(default)]
    pub auth: AuthConfig,
}

impl Config {
    /// Load configuration from a file path.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Config> {
        loader::load(path)
    }
}

/// HTTP server configuration settings.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// The socket address the server should listen on.
    pub listen_address: Option<SocketAddr>,
    /// TLS configuration for secure connections.
    pub tls: Option<TlsServerConfig>,
    /// Health endpoint configuration.
    #[serde(default)]
    pub health: HealthConfig,
    /// CORS configuration.
    pub cors: Option<CorsConfig>,
}
