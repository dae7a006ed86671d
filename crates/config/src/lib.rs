//! Graphchain configuration structures to map the graphchain.toml configuration.

#![deny(missing_docs)]

mod chat;
mod cors;
mod health;
mod loader;
mod server;

use std::path::Path;

pub use chat::{ChatConfig, DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_SYSTEM_PROMPT};
pub use cors::{AnyOrArray, AnyOrUrlArray, CorsConfig};
pub use health::HealthConfig;
pub use server::ServerConfig;

use serde::Deserialize;

/// Main configuration structure for the Graphchain service.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// HTTP server configuration settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Chat endpoint and upstream model settings.
    #[serde(default)]
    pub chat: ChatConfig,
}

impl Config {
    /// Load configuration from a file path.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Config> {
        loader::load(path)
    }

    /// Validates that the configuration can serve traffic. A missing API key is an error.
    pub fn validate(&self) -> anyhow::Result<()> {
        loader::validate(self)
    }
}
