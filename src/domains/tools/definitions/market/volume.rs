//! Trading volume tool.

use async_trait::async_trait;
use chrono::DateTime;
use rmcp::model::JsonObject;
use serde_json::Value;
use std::sync::Arc;

use crate::core::upstream::FinancialDataSource;
use crate::domains::tools::FinancialService;
use crate::domains::tools::definitions::common::{
    NOT_AVAILABLE, count, first_record, num, or_na, str_field, symbol_arg,
};
use crate::domains::tools::error::ToolError;

/// Current and average trading volume.
pub struct TradingVolumeService {
    source: Arc<dyn FinancialDataSource>,
}

impl TradingVolumeService {
    pub const NAME: &'static str = "get_trading_volume";
    pub const DESCRIPTION: &'static str = "Get trading volume data for a stock symbol";

    pub fn new(source: Arc<dyn FinancialDataSource>) -> Self {
        Self { source }
    }
}

/// Quote date: the `date` field, else the unix `timestamp` as a UTC day.
fn quote_date(quote: &JsonObject) -> String {
    if let Some(date) = str_field(quote, "date") {
        return date.to_string();
    }
    quote
        .get("timestamp")
        .and_then(Value::as_i64)
        .and_then(|ts| DateTime::from_timestamp(ts, 0))
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

#[async_trait]
impl FinancialService for TradingVolumeService {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn description(&self) -> &'static str {
        Self::DESCRIPTION
    }

    async fn execute(&self, arguments: &JsonObject) -> Result<String, ToolError> {
        let symbol = symbol_arg(arguments)?;
        let body = self.source.fetch(&format!("/quote/{symbol}"), &[]).await?;
        let quote = first_record(body, &symbol)?;

        Ok(format!(
            "Trading Volume for {}\n\n\
             Current Volume: {}\n\
             Average Volume: {}\n\
             Date: {}",
            str_field(&quote, "symbol").unwrap_or(&symbol),
            or_na(num(&quote, "volume"), count),
            or_na(num(&quote, "avgVolume"), count),
            quote_date(&quote),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::upstream::stub::StubSource;
    use serde_json::json;

    #[tokio::test]
    async fn test_volume_with_separators() {
        let stub = Arc::new(StubSource::new().with(
            "/quote/MSFT",
            json!([{
                "symbol": "MSFT",
                "volume": 21345678,
                "avgVolume": 19876543,
                "timestamp": 1704153600
            }]),
        ));
        let service = TradingVolumeService::new(stub);

        let args = json!({ "symbol": "MSFT" });
        let text = service.run(args.as_object().unwrap()).await.unwrap();
        assert_eq!(
            text,
            "Trading Volume for MSFT\n\n\
             Current Volume: 21,345,678\n\
             Average Volume: 19,876,543\n\
             Date: 2024-01-02"
        );
    }

    #[test]
    fn test_quote_date_prefers_date_field() {
        let quote = json!({ "date": "2024-05-01", "timestamp": 0 });
        assert_eq!(quote_date(quote.as_object().unwrap()), "2024-05-01");
        assert_eq!(quote_date(&JsonObject::new()), "N/A");
    }
}
