//! Stock quote tool.

use async_trait::async_trait;
use rmcp::model::JsonObject;
use std::sync::Arc;

use crate::core::upstream::FinancialDataSource;
use crate::domains::tools::FinancialService;
use crate::domains::tools::definitions::common::{
    first_record, money, num, or_na, str_field, symbol_arg,
};
use crate::domains::tools::error::ToolError;

/// Current price, daily change and trading ranges.
pub struct StockQuoteService {
    source: Arc<dyn FinancialDataSource>,
}

impl StockQuoteService {
    pub const NAME: &'static str = "get_stock_quote";
    pub const DESCRIPTION: &'static str = "Get current stock price and quote information";

    pub fn new(source: Arc<dyn FinancialDataSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl FinancialService for StockQuoteService {
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

        let change_pct = or_na(num(&quote, "changesPercentage"), |v| format!("{v:.2}%"));

        Ok(format!(
            "Stock Quote for {}\n\n\
             Current Price: {}\n\
             Change: {} ({})\n\
             Day Range: {} - {}\n\
             52-Week Range: {} - {}",
            str_field(&quote, "symbol").unwrap_or(&symbol),
            or_na(num(&quote, "price"), money),
            or_na(num(&quote, "change"), money),
            change_pct,
            or_na(num(&quote, "dayLow"), money),
            or_na(num(&quote, "dayHigh"), money),
            or_na(num(&quote, "yearLow"), money),
            or_na(num(&quote, "yearHigh"), money),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::upstream::stub::StubSource;
    use serde_json::json;

    fn args(symbol: &str) -> JsonObject {
        json!({ "symbol": symbol }).as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_quote_formatting() {
        let stub = Arc::new(StubSource::new().with(
            "/quote/AAPL",
            json!([{
                "symbol": "AAPL",
                "price": 150,
                "change": 2.5,
                "changesPercentage": 1.6949,
                "dayLow": 147.1,
                "dayHigh": 151.25,
                "yearLow": 124.17,
                "yearHigh": 198.23
            }]),
        ));
        let service = StockQuoteService::new(stub.clone());

        let text = service.run(&args("AAPL")).await.unwrap();
        assert!(text.starts_with("Stock Quote for AAPL"));
        assert!(text.contains("Current Price: $150.00"));
        assert!(text.contains("Change: $2.50 (1.69%)"));
        assert!(text.contains("Day Range: $147.10 - $151.25"));
        assert!(text.contains("52-Week Range: $124.17 - $198.23"));
        assert_eq!(stub.call_count(), 1);
    }

    #[tokio::test]
    async fn test_missing_fields_render_na() {
        let stub = Arc::new(StubSource::new().with("/quote/AAPL", json!([{ "price": 150 }])));
        let service = StockQuoteService::new(stub);

        let text = service.run(&args("aapl")).await.unwrap();
        assert!(text.contains("Change: N/A (N/A)"));
    }

    #[tokio::test]
    async fn test_unknown_symbol_degrades_to_text() {
        let stub = Arc::new(StubSource::new().with("/quote/ZZZZ", json!([])));
        let service = StockQuoteService::new(stub);

        let text = service.run(&args("ZZZZ")).await.unwrap();
        assert_eq!(text, "No data found for symbol: ZZZZ");
    }
}
