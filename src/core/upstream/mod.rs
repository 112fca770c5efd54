//! Access to the financial data provider.
//!
//! Services never talk HTTP directly. They go through [`FinancialDataSource`],
//! which the production [`FmpClient`] implements against the Financial
//! Modeling Prep REST API and which tests replace with an in-memory stub.

mod client;
mod error;
#[cfg(test)]
pub(crate) mod stub;

pub use client::FmpClient;
pub use error::UpstreamError;

use async_trait::async_trait;
use serde_json::Value;

/// Query parameters for a provider request, excluding the API key.
pub type QueryParams<'a> = [(&'a str, String)];

/// A source of raw financial data.
///
/// Implementations must be cheap to share across concurrent tool calls and
/// must not keep per-call state.
#[async_trait]
pub trait FinancialDataSource: Send + Sync {
    /// Fetch `path` (relative to the provider base URL) with `params` and
    /// return the decoded JSON body.
    ///
    /// Empty arrays and objects are returned as-is; deciding whether that
    /// means "unknown symbol" is up to the caller.
    async fn fetch(&self, path: &str, params: &QueryParams<'_>) -> Result<Value, UpstreamError>;
}
