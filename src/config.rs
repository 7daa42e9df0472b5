//! factdesk configuration management

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main factdesk configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Conversation engine configuration
    #[serde(default)]
    pub engine: EngineConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Allowed CORS origins (empty = any origin, without credentials)
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            cors_origins: Vec::new(),
        }
    }
}

/// Conversation engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Upstream conversation service; the endpoint answers 503 when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream_url: Option<String>,

    /// Connect timeout for the upstream in seconds
    pub connect_timeout_secs: u64,

    /// Inbound request headers forwarded to the upstream
    pub forward_headers: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            upstream_url: None,
            connect_timeout_secs: 10,
            forward_headers: vec!["authorization".to_string()],
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Render as pretty TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }
}

/// Parse an `ALLOWED_ORIGINS` style value.
///
/// `*` (or an empty value) means any origin and yields an empty list;
/// otherwise a comma-separated list of origins.
pub fn parse_origins(value: &str) -> Vec<String> {
    let value = value.trim();
    if value.is_empty() || value == "*" {
        return Vec::new();
    }
    value
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}
