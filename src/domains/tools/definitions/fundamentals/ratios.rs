//! Financial ratios tool.

use async_trait::async_trait;
use rmcp::model::JsonObject;
use std::sync::Arc;

use crate::core::upstream::FinancialDataSource;
use crate::domains::tools::FinancialService;
use crate::domains::tools::definitions::common::{
    first_record, fixed2, num, or_na, percent, str_field, symbol_arg, text,
};
use crate::domains::tools::error::ToolError;

/// Liquidity, profitability and leverage ratios from the latest period.
pub struct FinancialRatiosService {
    source: Arc<dyn FinancialDataSource>,
}

impl FinancialRatiosService {
    pub const NAME: &'static str = "get_financial_ratios";
    pub const DESCRIPTION: &'static str =
        "Get financial ratios and metrics for analyzing company performance";

    pub fn new(source: Arc<dyn FinancialDataSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl FinancialService for FinancialRatiosService {
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
            .fetch(&format!("/ratios/{symbol}"), &[("limit", "1".to_string())])
            .await?;
        let ratios = first_record(body, &symbol)?;
        let pct = |key: &str| or_na(num(&ratios, key), percent);
        let plain = |key: &str| or_na(num(&ratios, key), fixed2);

        Ok(format!(
            "Financial Ratios for {}\n\n\
             Date: {}\n\n\
             LIQUIDITY RATIOS:\n\
             Current Ratio: {}\n\
             Quick Ratio: {}\n\n\
             PROFITABILITY RATIOS:\n\
             Return on Equity (ROE): {}\n\
             Return on Assets (ROA): {}\n\
             Gross Profit Margin: {}\n\
             Operating Profit Margin: {}\n\
             Net Profit Margin: {}\n\n\
             LEVERAGE RATIOS:\n\
             Debt-to-Equity Ratio: {}",
            str_field(&ratios, "symbol").unwrap_or(&symbol),
            text(&ratios, "date"),
            plain("currentRatio"),
            plain("quickRatio"),
            pct("returnOnEquity"),
            pct("returnOnAssets"),
            pct("grossProfitMargin"),
            pct("operatingProfitMargin"),
            pct("netProfitMargin"),
            plain("debtEquityRatio"),
        ))
    }
}
