//! Historical prices tool.

use async_trait::async_trait;
use rmcp::model::JsonObject;
use serde_json::Value;
use std::sync::Arc;

use crate::core::upstream::FinancialDataSource;
use crate::domains::tools::FinancialService;
use crate::domains::tools::definitions::common::{
    count, money, num, or_na, records, str_arg, symbol_arg, text,
};
use crate::domains::tools::error::ToolError;

/// Rows shown before the output is truncated.
const MAX_ROWS: usize = 5;

/// Daily OHLCV history, optionally bounded by dates.
pub struct HistoricalPricesService {
    source: Arc<dyn FinancialDataSource>,
}

impl HistoricalPricesService {
    pub const NAME: &'static str = "get_historical_prices";
    pub const DESCRIPTION: &'static str = "Get historical price data for a stock symbol";

    pub fn new(source: Arc<dyn FinancialDataSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl FinancialService for HistoricalPricesService {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn description(&self) -> &'static str {
        Self::DESCRIPTION
    }

    async fn execute(&self, arguments: &JsonObject) -> Result<String, ToolError> {
        let symbol = symbol_arg(arguments)?;

        let mut params = Vec::new();
        if let Some(from) = str_arg(arguments, "from_date") {
            params.push(("from", from.to_string()));
        }
        if let Some(to) = str_arg(arguments, "to_date") {
            params.push(("to", to.to_string()));
        }

        let body = self
            .source
            .fetch(&format!("/historical-price-full/{symbol}"), &params)
            .await?;

        // The provider wraps the series as {"symbol", "historical": [...]}.
        let series = match body {
            Value::Object(mut wrapper) => wrapper
                .remove("historical")
                .unwrap_or_else(|| Value::Array(Vec::new())),
            other => other,
        };
        let rows = records(series)?;
        if rows.is_empty() {
            return Err(ToolError::SymbolNotFound(symbol));
        }

        let mut out = format!("Historical Prices for {symbol}\n\n");
        for row in rows.iter().take(MAX_ROWS) {
            out.push_str(&format!(
                "Date: {} | Open: {} | High: {} | Low: {} | Close: {} | Volume: {}\n",
                text(row, "date"),
                or_na(num(row, "open"), money),
                or_na(num(row, "high"), money),
                or_na(num(row, "low"), money),
                or_na(num(row, "close"), money),
                or_na(num(row, "volume"), count),
            ));
        }
        if rows.len() > MAX_ROWS {
            out.push_str(&format!("\n... and {} more entries", rows.len() - MAX_ROWS));
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::upstream::stub::StubSource;
    use serde_json::json;

    fn day(date: &str, close: f64) -> Value {
        json!({
            "date": date,
            "open": close - 1.0,
            "high": close + 1.0,
            "low": close - 2.0,
            "close": close,
            "volume": 1234567
        })
    }

    #[tokio::test]
    async fn test_truncates_to_five_rows() {
        let history: Vec<Value> = (1..=8)
            .map(|d| day(&format!("2024-01-{d:02}"), 100.0 + d as f64))
            .collect();
        let stub = Arc::new(StubSource::new().with(
            "/historical-price-full/AAPL",
            json!({ "symbol": "AAPL", "historical": history }),
        ));
        let service = HistoricalPricesService::new(stub.clone());

        let args = json!({ "symbol": "AAPL", "from_date": "2024-01-01", "to_date": "2024-01-31" });
        let text = service.run(args.as_object().unwrap()).await.unwrap();

        assert!(text.starts_with("Historical Prices for AAPL"));
        assert!(text.contains(
            "Date: 2024-01-01 | Open: $100.00 | High: $102.00 | Low: $99.00 | \
             Close: $101.00 | Volume: 1,234,567"
        ));
        assert!(!text.contains("2024-01-06"));
        assert!(text.ends_with("... and 3 more entries"));

        let calls = stub.calls();
        assert_eq!(
            calls[0].params,
            vec![
                ("from".to_string(), "2024-01-01".to_string()),
                ("to".to_string(), "2024-01-31".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_history_is_no_data() {
        let stub = Arc::new(StubSource::new().with("/historical-price-full/ZZZZ", json!({})));
        let service = HistoricalPricesService::new(stub);

        let args = json!({ "symbol": "ZZZZ" });
        let text = service.run(args.as_object().unwrap()).await.unwrap();
        assert_eq!(text, "No data found for symbol: ZZZZ");
    }
}
