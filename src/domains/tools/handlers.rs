//! Tool handler contract and the tool call envelope.
//!
//! Every financial tool implements [`FinancialService`]. A call travels as a
//! [`ToolInput`] envelope and comes back as a [`ToolOutput`], which both
//! transports turn into the same MCP `CallToolResult`.

use async_trait::async_trait;
use rmcp::model::{CallToolResult, Content, JsonObject};
use serde::{Deserialize, Serialize};

use super::error::{ToolError, ToolFailure};

/// A tool backed by the financial data provider.
///
/// Implementations receive arguments that already passed schema validation.
#[async_trait]
pub trait FinancialService: Send + Sync {
    /// Tool name exposed to clients.
    fn name(&self) -> &'static str;

    /// Human readable tool description.
    fn description(&self) -> &'static str;

    /// Fetch and format the tool result.
    async fn execute(&self, arguments: &JsonObject) -> Result<String, ToolError>;

    /// Execute, degrading "no data" outcomes to informative text.
    async fn run(&self, arguments: &JsonObject) -> Result<String, ToolError> {
        match self.execute(arguments).await {
            Err(ToolError::SymbolNotFound(symbol)) => Ok(no_data_response(&symbol)),
            Err(err @ ToolError::DataIncomplete { .. }) => Ok(err.to_string()),
            other => other,
        }
    }
}

/// Standard text for a symbol the provider knows nothing about.
pub fn no_data_response(symbol: &str) -> String {
    format!("No data found for symbol: {symbol}")
}

/// A tool call request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInput {
    /// The name of the tool to execute.
    pub tool_name: String,

    /// The arguments to pass to the tool.
    #[serde(default)]
    pub arguments: JsonObject,
}

impl ToolInput {
    pub fn new(tool_name: impl Into<String>, arguments: JsonObject) -> Self {
        Self {
            tool_name: tool_name.into(),
            arguments,
        }
    }
}

/// Error descriptor carried by a failed call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub kind: String,
    pub message: String,
}

/// Output from a tool execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolOutput {
    /// The formatted text result.
    Content { content: String },

    /// A structured failure.
    Error { error: ErrorBody },
}

impl ToolOutput {
    /// Create a successful tool output.
    pub fn success(content: impl Into<String>) -> Self {
        Self::Content {
            content: content.into(),
        }
    }

    /// Create a failed tool output.
    pub fn failure(failure: &ToolFailure) -> Self {
        Self::Error {
            error: ErrorBody {
                kind: failure.kind().to_string(),
                message: failure.to_string(),
            },
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// Wrap the envelope in an MCP tool result.
    ///
    /// Failures keep their descriptor in `structuredContent.error` and set
    /// `isError`.
    pub fn into_call_result(self) -> CallToolResult {
        match self {
            Self::Content { content } => CallToolResult::success(vec![Content::text(content)]),
            Self::Error { error } => {
                let mut result = CallToolResult::error(vec![Content::text(error.message.clone())]);
                result.structured_content = Some(serde_json::json!({ "error": error }));
                result
            }
        }
    }
}

impl From<Result<String, ToolFailure>> for ToolOutput {
    fn from(result: Result<String, ToolFailure>) -> Self {
        match result {
            Ok(content) => Self::success(content),
            Err(failure) => Self::failure(&failure),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::upstream::UpstreamError;
    use serde_json::json;

    #[test]
    fn test_input_envelope_defaults_arguments() {
        let input: ToolInput =
            serde_json::from_value(json!({ "tool_name": "get_market_indices" })).unwrap();
        assert_eq!(input.tool_name, "get_market_indices");
        assert!(input.arguments.is_empty());
    }

    #[test]
    fn test_output_envelope_shapes() {
        let ok = ToolOutput::success("hello");
        assert_eq!(serde_json::to_value(&ok).unwrap(), json!({ "content": "hello" }));

        let failure = ToolFailure::new("get_stock_quote", UpstreamError::RateLimited.into());
        let err = ToolOutput::failure(&failure);
        assert!(err.is_error());
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({ "error": {
                "kind": "UpstreamRateLimited",
                "message": "get_stock_quote: Provider rate limit exceeded, retry later"
            }})
        );
    }

    #[test]
    fn test_error_call_result_carries_descriptor() {
        let failure = ToolFailure::new("bogus", ToolError::not_found("bogus"));
        let result = ToolOutput::failure(&failure).into_call_result();

        assert_eq!(result.is_error, Some(true));
        let structured = result.structured_content.unwrap();
        assert_eq!(structured["error"]["kind"], "ToolNotFound");
    }

    #[test]
    fn test_success_call_result_is_text() {
        let result = ToolOutput::success("Market Indices").into_call_result();
        assert_eq!(result.is_error, Some(false));
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["content"][0]["text"], "Market Indices");
    }
}
