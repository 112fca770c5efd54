//! Market indices tool.

use async_trait::async_trait;
use rmcp::model::JsonObject;
use std::sync::Arc;

use crate::core::upstream::FinancialDataSource;
use crate::domains::tools::FinancialService;
use crate::domains::tools::definitions::common::{money, num, or_na, records, str_field, text};
use crate::domains::tools::error::ToolError;

/// Quotes for the major market indices.
pub struct MarketIndicesService {
    source: Arc<dyn FinancialDataSource>,
}

impl MarketIndicesService {
    pub const NAME: &'static str = "get_market_indices";
    pub const DESCRIPTION: &'static str = "Get market indices information (S&P 500, NASDAQ, DOW)";

    pub fn new(source: Arc<dyn FinancialDataSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl FinancialService for MarketIndicesService {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn description(&self) -> &'static str {
        Self::DESCRIPTION
    }

    async fn execute(&self, _arguments: &JsonObject) -> Result<String, ToolError> {
        let indices = records(self.source.fetch("/quotes/index", &[]).await?)?;
        if indices.is_empty() {
            return Ok("No market indices data available".to_string());
        }

        let mut out = String::from("Market Indices\n\n");
        for index in &indices {
            let symbol = text(index, "symbol");
            let name = str_field(index, "name").unwrap_or(&symbol);
            let change = match (num(index, "change"), num(index, "changesPercentage")) {
                (Some(change), Some(pct)) => format!("{} ({pct:.2}%)", money(change)),
                _ => "N/A".to_string(),
            };
            out.push_str(&format!(
                "Index: {name}\nSymbol: {symbol}\nPrice: {}\nChange: {change}\n\n",
                or_na(num(index, "price"), money),
            ));
        }

        Ok(out.trim_end().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::upstream::stub::StubSource;
    use serde_json::json;

    #[tokio::test]
    async fn test_lists_each_index() {
        let stub = Arc::new(StubSource::new().with(
            "/quotes/index",
            json!([
                {
                    "symbol": "^GSPC",
                    "name": "S&P 500",
                    "price": 5000.5,
                    "change": -12.25,
                    "changesPercentage": -0.2456
                },
                { "symbol": "^DJI", "price": 38000, "change": 100 }
            ]),
        ));
        let service = MarketIndicesService::new(stub);

        let text = service.run(&JsonObject::new()).await.unwrap();
        assert!(text.starts_with("Market Indices"));
        assert!(text.contains(
            "Index: S&P 500\nSymbol: ^GSPC\nPrice: $5,000.50\nChange: -$12.25 (-0.25%)"
        ));
        assert!(text.contains("Index: ^DJI\nSymbol: ^DJI\nPrice: $38,000.00\nChange: N/A"));
    }

    #[tokio::test]
    async fn test_empty_list_is_valid_result() {
        let stub = Arc::new(StubSource::new().with("/quotes/index", json!([])));
        let service = MarketIndicesService::new(stub);

        let text = service.run(&JsonObject::new()).await.unwrap();
        assert_eq!(text, "No market indices data available");
    }
}
