//! Company profile tool.

use async_trait::async_trait;
use rmcp::model::JsonObject;
use std::sync::Arc;

use crate::core::upstream::FinancialDataSource;
use crate::domains::tools::FinancialService;
use crate::domains::tools::definitions::common::{first_record, str_field, symbol_arg, text};
use crate::domains::tools::error::ToolError;

pub struct CompanyProfileService {
    source: Arc<dyn FinancialDataSource>,
}

impl CompanyProfileService {
    pub const NAME: &'static str = "get_company_profile";
    pub const DESCRIPTION: &'static str = "Get company profile information";

    pub fn new(source: Arc<dyn FinancialDataSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl FinancialService for CompanyProfileService {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn description(&self) -> &'static str {
        Self::DESCRIPTION
    }

    async fn execute(&self, arguments: &JsonObject) -> Result<String, ToolError> {
        let symbol = symbol_arg(arguments)?;
        let body = self.source.fetch(&format!("/profile/{symbol}"), &[]).await?;
        let profile = first_record(body, &symbol)?;

        let exchange = if profile.contains_key("exchangeShortName") {
            text(&profile, "exchangeShortName")
        } else {
            text(&profile, "exchange")
        };

        Ok(format!(
            "Company Profile for {}\n\n\
             Company Name: {}\n\
             Sector: {}\n\
             Industry: {}\n\
             CEO: {}\n\
             Exchange: {}\n\
             Website: {}\n\
             Description: {}",
            str_field(&profile, "symbol").unwrap_or(&symbol),
            text(&profile, "companyName"),
            text(&profile, "sector"),
            text(&profile, "industry"),
            text(&profile, "ceo"),
            exchange,
            text(&profile, "website"),
            text(&profile, "description"),
        ))
    }
}
