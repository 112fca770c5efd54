//! In-memory data source for tests.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

use super::{FinancialDataSource, QueryParams, UpstreamError};

/// A recorded provider request.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub path: String,
    pub params: Vec<(String, String)>,
}

/// Serves canned responses keyed by request path and records every call.
///
/// Paths without a canned response answer with `[]`, which is how the
/// provider reports unknown symbols.
#[derive(Debug, Default)]
pub struct StubSource {
    responses: HashMap<String, Result<Value, UpstreamError>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl StubSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer requests for `path` with `body`.
    pub fn with(mut self, path: &str, body: Value) -> Self {
        self.responses.insert(path.to_string(), Ok(body));
        self
    }

    /// Fail requests for `path` with `error`.
    pub fn with_error(mut self, path: &str, error: UpstreamError) -> Self {
        self.responses.insert(path.to_string(), Err(error));
        self
    }

    /// Number of requests received so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// All requests received so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl FinancialDataSource for StubSource {
    async fn fetch(&self, path: &str, params: &QueryParams<'_>) -> Result<Value, UpstreamError> {
        self.calls.lock().unwrap().push(RecordedCall {
            path: path.to_string(),
            params: params
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        });

        self.responses
            .get(path)
            .cloned()
            .unwrap_or_else(|| Ok(Value::Array(Vec::new())))
    }
}
