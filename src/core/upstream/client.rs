//! Financial Modeling Prep HTTP client.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use super::{FinancialDataSource, QueryParams, UpstreamError};
use crate::core::config::UpstreamConfig;

/// Thin request/response client for the FMP REST API.
///
/// Injects the API key as the `apikey` query parameter on every request.
/// Holds a pooled `reqwest::Client`; cloning is cheap.
#[derive(Clone)]
pub struct FmpClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

/// Custom Debug implementation to redact the API key from logs.
impl std::fmt::Debug for FmpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FmpClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl FmpClient {
    /// Default FMP API base URL.
    pub const DEFAULT_BASE_URL: &'static str = "https://financialmodelingprep.com/api/v3";

    /// Create a client from the upstream configuration and an API key.
    pub fn new(config: &UpstreamConfig, api_key: impl Into<String>) -> Result<Self, UpstreamError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| UpstreamError::unavailable(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    /// The base URL requests are issued against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl FinancialDataSource for FmpClient {
    #[instrument(skip(self, params))]
    async fn fetch(&self, path: &str, params: &QueryParams<'_>) -> Result<Value, UpstreamError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {} ({} params)", path, params.len());

        let response = self
            .http
            .get(&url)
            .query(params)
            .query(&[("apikey", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    UpstreamError::unavailable("request timed out")
                } else if e.is_connect() {
                    UpstreamError::unavailable("connection failed")
                } else {
                    UpstreamError::unavailable(e.to_string())
                }
            })?;

        let status = response.status();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                warn!("Provider rejected API key ({})", status);
                return Err(UpstreamError::Unauthorized {
                    status: status.as_u16(),
                });
            }
            StatusCode::TOO_MANY_REQUESTS => {
                warn!("Provider rate limit hit on {}", path);
                return Err(UpstreamError::RateLimited);
            }
            s if s.is_server_error() => {
                return Err(UpstreamError::unavailable(format!("server error ({s})")));
            }
            s if !s.is_success() => {
                return Err(UpstreamError::unavailable(format!("unexpected status ({s})")));
            }
            _ => {}
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| UpstreamError::unavailable(format!("failed to read body: {e}")))?;

        debug!("Provider response received: {} bytes", body.len());

        serde_json::from_slice(&body).map_err(|e| UpstreamError::malformed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::Method::GET;
    use httpmock::MockServer;
    use serde_json::json;

    fn client_for(server: &MockServer, timeout_secs: u64) -> FmpClient {
        let config = UpstreamConfig {
            base_url: server.base_url(),
            timeout_secs,
        };
        FmpClient::new(&config, "test-key").unwrap()
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = UpstreamConfig {
            base_url: "https://example.test/api/v3/".to_string(),
            timeout_secs: 5,
        };
        let client = FmpClient::new(&config, "k").unwrap();
        assert_eq!(client.base_url(), "https://example.test/api/v3");
    }

    #[tokio::test]
    async fn test_fetch_injects_api_key_and_params() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/quote/AAPL")
                    .query_param("apikey", "test-key")
                    .query_param("limit", "2");
                then.status(200)
                    .json_body(json!([{ "symbol": "AAPL", "price": 150.0 }]));
            })
            .await;

        let value = client_for(&server, 5)
            .fetch("/quote/AAPL", &[("limit", "2".to_string())])
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(value[0]["price"], 150.0);
    }

    #[tokio::test]
    async fn test_fetch_maps_status_codes() {
        let cases = [
            (401, "UpstreamUnauthorized"),
            (403, "UpstreamUnauthorized"),
            (429, "UpstreamRateLimited"),
            (500, "UpstreamUnavailable"),
            (503, "UpstreamUnavailable"),
        ];

        for (status, kind) in cases {
            let server = MockServer::start_async().await;
            server
                .mock_async(|when, then| {
                    when.method(GET).path("/profile/AAPL");
                    then.status(status).body("nope");
                })
                .await;

            let err = client_for(&server, 5)
                .fetch("/profile/AAPL", &[])
                .await
                .unwrap_err();
            assert_eq!(err.kind(), kind, "status {status}");
        }
    }

    #[tokio::test]
    async fn test_fetch_rejects_non_json_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/ratios/AAPL");
                then.status(200).body("<html>maintenance</html>");
            })
            .await;

        let err = client_for(&server, 5)
            .fetch("/ratios/AAPL", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, UpstreamError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_fetch_returns_empty_array_as_is() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/quote/NOPE");
                then.status(200).json_body(json!([]));
            })
            .await;

        let value = client_for(&server, 5)
            .fetch("/quote/NOPE", &[])
            .await
            .unwrap();
        assert_eq!(value, json!([]));
    }

    #[tokio::test]
    async fn test_fetch_timeout_is_unavailable() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/quote/SLOW");
                then.status(200)
                    .delay(Duration::from_secs(2))
                    .json_body(json!([]));
            })
            .await;

        let err = client_for(&server, 1)
            .fetch("/quote/SLOW", &[])
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "UpstreamUnavailable");
        assert!(err.to_string().contains("timed out"), "{err}");
    }

    #[tokio::test]
    async fn test_fetch_connection_failure_is_unavailable() {
        let config = UpstreamConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            timeout_secs: 2,
        };
        let client = FmpClient::new(&config, "k").unwrap();

        let err = client.fetch("/quote/AAPL", &[]).await.unwrap_err();
        assert_eq!(err.kind(), "UpstreamUnavailable");
    }

    #[test]
    fn test_api_key_redacted_in_debug() {
        let client = FmpClient::new(&UpstreamConfig::default(), "super_secret_key").unwrap();
        let debug_str = format!("{:?}", client);
        assert!(debug_str.contains("REDACTED"));
        assert!(!debug_str.contains("super_secret_key"));
    }
}
