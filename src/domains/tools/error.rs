//! Tool-specific error types.

use thiserror::Error;

use crate::core::upstream::UpstreamError;

/// Errors that can occur while invoking a tool.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The requested tool was not found.
    #[error("Tool not found: {0}")]
    NotFound(String),

    /// An argument failed schema validation.
    #[error("Invalid argument '{field}': {reason}")]
    InvalidArguments { field: String, reason: String },

    /// The provider call failed.
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    /// The provider has no data for the symbol.
    #[error("No data found for symbol: {0}")]
    SymbolNotFound(String),

    /// The provider answered, but without fields the tool cannot do without.
    #[error("Incomplete data for symbol {symbol}: missing {}", .fields.join(", "))]
    DataIncomplete { symbol: String, fields: Vec<String> },
}

impl ToolError {
    /// Create a new "not found" error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    /// Create a new "invalid arguments" error for `field`.
    pub fn invalid_argument(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArguments {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Stable kind label used in error envelopes.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "ToolNotFound",
            Self::InvalidArguments { .. } => "ArgumentInvalid",
            Self::Upstream(e) => e.kind(),
            Self::SymbolNotFound(_) => "SymbolNotFound",
            Self::DataIncomplete { .. } => "DataIncomplete",
        }
    }
}

/// A tool error annotated with the tool it came from.
#[derive(Debug, Error)]
#[error("{tool}: {error}")]
pub struct ToolFailure {
    pub tool: String,
    #[source]
    pub error: ToolError,
}

impl ToolFailure {
    pub fn new(tool: impl Into<String>, error: ToolError) -> Self {
        Self {
            tool: tool.into(),
            error,
        }
    }

    pub fn kind(&self) -> &'static str {
        self.error.kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(ToolError::not_found("x").kind(), "ToolNotFound");
        assert_eq!(
            ToolError::invalid_argument("period", "too big").kind(),
            "ArgumentInvalid"
        );
        assert_eq!(
            ToolError::from(UpstreamError::RateLimited).kind(),
            "UpstreamRateLimited"
        );
    }

    #[test]
    fn test_failure_message_names_tool() {
        let failure = ToolFailure::new(
            "get_stock_quote",
            ToolError::Upstream(UpstreamError::unavailable("server error (502)")),
        );
        assert_eq!(failure.kind(), "UpstreamUnavailable");
        assert_eq!(
            failure.to_string(),
            "get_stock_quote: Provider unavailable: server error (502)"
        );
    }

    #[test]
    fn test_data_incomplete_lists_fields() {
        let err = ToolError::DataIncomplete {
            symbol: "AAPL".to_string(),
            fields: vec!["dcf".to_string(), "Stock Price".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Incomplete data for symbol AAPL: missing dcf, Stock Price"
        );
    }
}
