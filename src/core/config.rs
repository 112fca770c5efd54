//! Configuration management for the MCP server.
//!
//! This module provides a centralized configuration structure populated from
//! defaults and environment variables (including a `.env` file). The binary
//! then applies command-line overrides and calls [`Config::validate`] once
//! before anything is started.

use super::error::{Error, Result};
use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{info, warn};

/// Environment variable holding the Financial Modeling Prep API key.
pub const API_KEY_ENV: &str = "FMP_API_KEY";

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// External API credentials configuration.
    pub credentials: CredentialsConfig,

    /// Financial data provider settings.
    pub upstream: UpstreamConfig,

    /// Location of tool schemas and static catalogs.
    pub schema: SchemaConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

/// Configuration for external API credentials.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct CredentialsConfig {
    /// Financial Modeling Prep API key. Required at startup.
    pub fmp_api_key: Option<String>,
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("fmp_api_key", &self.fmp_api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Financial data provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL every request path is appended to.
    pub base_url: String,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: super::upstream::FmpClient::DEFAULT_BASE_URL.to_string(),
            timeout_secs: 15,
        }
    }
}

/// Schema document location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaConfig {
    /// Directory containing `services/`, `resources.json` and `prompts.json`.
    pub dir: PathBuf,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/schema")),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "financial-modeling-prep".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            transport: TransportConfig::default(),
            credentials: CredentialsConfig::default(),
            upstream: UpstreamConfig::default(),
            schema: SchemaConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Server settings use the `MCP_` prefix (`MCP_SERVER_NAME`,
    /// `MCP_LOG_LEVEL`, `MCP_SCHEMA_DIR`, transport variables); provider
    /// settings use `FMP_` (`FMP_API_KEY`, `FMP_BASE_URL`, `FMP_TIMEOUT_SECS`).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Ok(dir) = std::env::var("MCP_SCHEMA_DIR") {
            config.schema.dir = PathBuf::from(dir);
        }

        // Load transport configuration from environment
        config.transport = TransportConfig::from_env();

        config.credentials.fmp_api_key = std::env::var(API_KEY_ENV)
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        if let Ok(base_url) = std::env::var("FMP_BASE_URL") {
            config.upstream.base_url = base_url;
        }

        if let Ok(timeout) = std::env::var("FMP_TIMEOUT_SECS") {
            match timeout.parse() {
                Ok(secs) => config.upstream.timeout_secs = secs,
                Err(_) => warn!(
                    "Ignoring invalid FMP_TIMEOUT_SECS '{}', using {}s",
                    timeout, config.upstream.timeout_secs
                ),
            }
        }

        config
    }

    /// The provider API key, or a configuration error if it is missing.
    pub fn api_key(&self) -> Result<&str> {
        self.credentials.fmp_api_key.as_deref().ok_or_else(|| {
            Error::config(format!(
                "{API_KEY_ENV} environment variable is required \
                 (create a .env file with {API_KEY_ENV}=your_api_key_here)"
            ))
        })
    }

    /// Startup validation. Must succeed before the server is built.
    pub fn validate(&self) -> Result<()> {
        self.api_key()?;
        info!("FMP API key loaded from environment");

        if self.upstream.timeout_secs == 0 {
            return Err(Error::config("FMP_TIMEOUT_SECS must be greater than zero"));
        }

        self.transport.validate()?;
        Ok(())
    }
}
