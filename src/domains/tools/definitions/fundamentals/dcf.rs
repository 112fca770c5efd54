//! DCF valuation tool.

use async_trait::async_trait;
use rmcp::model::JsonObject;
use std::sync::Arc;

use crate::core::upstream::FinancialDataSource;
use crate::domains::tools::FinancialService;
use crate::domains::tools::definitions::common::{
    Recommendation, first_record, money, num, or_na, str_field, symbol_arg, text, upside_pct,
};
use crate::domains::tools::error::ToolError;

/// Provider field carrying the share price in DCF responses.
pub const STOCK_PRICE_FIELD: &str = "Stock Price";

/// Provider DCF fair value against the current price.
pub struct DcfValuationService {
    source: Arc<dyn FinancialDataSource>,
}

impl DcfValuationService {
    pub const NAME: &'static str = "get_dcf_valuation";
    pub const DESCRIPTION: &'static str =
        "Get discounted cash flow (DCF) valuation for a company";

    pub fn new(source: Arc<dyn FinancialDataSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl FinancialService for DcfValuationService {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn description(&self) -> &'static str {
        Self::DESCRIPTION
    }

    async fn execute(&self, arguments: &JsonObject) -> Result<String, ToolError> {
        let symbol = symbol_arg(arguments)?;
        let body = self
            .source
            .fetch(&format!("/discounted-cash-flow/{symbol}"), &[])
            .await?;
        let record = first_record(body, &symbol)?;

        let dcf = num(&record, "dcf");
        let price = num(&record, STOCK_PRICE_FIELD);
        if dcf.is_none() && price.is_none() {
            return Err(ToolError::DataIncomplete {
                symbol,
                fields: vec!["dcf".to_string(), STOCK_PRICE_FIELD.to_string()],
            });
        }

        let mut out = format!(
            "DCF Valuation Analysis for {}\n\n\
             Date: {}\n\n\
             DCF Fair Value: {}\n\
             Current Stock Price: {}",
            str_field(&record, "symbol").unwrap_or(&symbol),
            text(&record, "date"),
            or_na(dcf, money),
            or_na(price, money),
        );

        if let Some(upside) = dcf.zip(price).and_then(|(d, p)| upside_pct(d, p)) {
            let band = Recommendation::from_upside(upside).valuation();
            out.push_str(&format!("\nUpside/Downside: {upside:.2}% ({band})"));
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::upstream::stub::StubSource;
    use serde_json::{Value, json};

    async fn run_with(record: Value) -> String {
        let stub = Arc::new(StubSource::new().with("/discounted-cash-flow/AAPL", json!([record])));
        let service = DcfValuationService::new(stub);
        let args = json!({ "symbol": "AAPL" });
        service.run(args.as_object().unwrap()).await.unwrap()
    }

    #[tokio::test]
    async fn test_undervalued() {
        let text = run_with(json!({
            "symbol": "AAPL", "date": "2024-01-02", "dcf": 180.0, "Stock Price": 150.0
        }))
        .await;
        assert_eq!(
            text,
            "DCF Valuation Analysis for AAPL\n\n\
             Date: 2024-01-02\n\n\
             DCF Fair Value: $180.00\n\
             Current Stock Price: $150.00\n\
             Upside/Downside: 20.00% (Undervalued)"
        );
    }

    #[tokio::test]
    async fn test_bands() {
        let fair = run_with(json!({ "dcf": 105.0, "Stock Price": 100.0 })).await;
        assert!(fair.contains("Upside/Downside: 5.00% (Fair Value)"));

        let over = run_with(json!({ "dcf": 80.0, "Stock Price": 100.0 })).await;
        assert!(over.contains("Upside/Downside: -20.00% (Overvalued)"));
    }

    #[tokio::test]
    async fn test_partial_record() {
        let text = run_with(json!({ "dcf": 105.0 })).await;
        assert!(text.contains("Current Stock Price: N/A"));
        assert!(!text.contains("Upside"));

        let text = run_with(json!({ "symbol": "AAPL", "date": "2024-01-02" })).await;
        assert_eq!(
            text,
            "Incomplete data for symbol AAPL: missing dcf, Stock Price"
        );
    }
}
