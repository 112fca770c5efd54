//! Income statement tool.

use async_trait::async_trait;
use rmcp::model::JsonObject;
use std::sync::Arc;

use crate::core::upstream::FinancialDataSource;
use crate::domains::tools::FinancialService;
use crate::domains::tools::definitions::common::{
    first_record, money_whole, num, or_na, str_field, symbol_arg, text,
};
use crate::domains::tools::error::ToolError;

/// Headline figures from the latest income statement.
pub struct IncomeStatementService {
    source: Arc<dyn FinancialDataSource>,
}

impl IncomeStatementService {
    pub const NAME: &'static str = "get_income_statement";
    pub const DESCRIPTION: &'static str = "Get income statement information for a company";

    pub fn new(source: Arc<dyn FinancialDataSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl FinancialService for IncomeStatementService {
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
            .fetch(
                &format!("/income-statement/{symbol}"),
                &[("limit", "1".to_string())],
            )
            .await?;
        let statement = first_record(body, &symbol)?;

        Ok(format!(
            "Income Statement for {}\n\n\
             Date: {}\n\
             Revenue: {}\n\
             Gross Profit: {}\n\
             Operating Income: {}\n\
             Net Income: {}",
            str_field(&statement, "symbol").unwrap_or(&symbol),
            text(&statement, "date"),
            or_na(num(&statement, "revenue"), money_whole),
            or_na(num(&statement, "grossProfit"), money_whole),
            or_na(num(&statement, "operatingIncome"), money_whole),
            or_na(num(&statement, "netIncome"), money_whole),
        ))
    }
}
