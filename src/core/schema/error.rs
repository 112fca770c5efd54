//! Schema and catalog loading errors.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading tool schemas or the resource/prompt catalogs.
///
/// All of these are startup-time failures: a registered tool without a valid
/// schema prevents the server from starting.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// No schema document exists for the tool.
    #[error("Schema not found for tool '{name}' (looked in {path})")]
    NotFound { name: String, path: PathBuf },

    /// The schema document exists but is not a usable JSON-Schema object.
    #[error("Invalid schema for tool '{name}': {reason}")]
    Invalid { name: String, reason: String },

    /// A resource or prompt catalog document is malformed.
    #[error("Invalid configuration document {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    /// Reading a document failed for a reason other than it being absent.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SchemaError {
    /// Create a new "invalid schema" error.
    pub fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a new "invalid configuration" error.
    pub fn config_invalid(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::ConfigInvalid {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Stable kind label used in logs and error envelopes.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "SchemaNotFound",
            Self::Invalid { .. } => "SchemaInvalid",
            Self::ConfigInvalid { .. } => "ConfigInvalid",
            Self::Io { .. } => "ConfigInvalid",
        }
    }
}
