//! Error types and handling for the MCP server.
//!
//! This module defines the unified error type for startup and lifecycle
//! failures. Per-call tool failures never reach it: they are turned into
//! structured tool results at the registry boundary.

use thiserror::Error;

/// A specialized Result type for MCP server operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the MCP server.
#[derive(Debug, Error)]
pub enum Error {
    /// Schema or catalog documents could not be loaded.
    #[error("Schema error: {0}")]
    Schema(#[from] super::schema::SchemaError),

    /// The upstream client could not be created.
    #[error("Upstream error: {0}")]
    Upstream(#[from] super::upstream::UpstreamError),

    /// Transport setup or runtime failure.
    #[error("Transport error: {0}")]
    Transport(#[from] super::transport::TransportError),

    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors from file operations or network communication.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a new configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
