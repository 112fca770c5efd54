//! Tool definitions module.
//!
//! Each tool lives in its own file, grouped by what it reports on:
//!
//! - `market/` - quotes, history, indices, volume, technical indicators
//! - `fundamentals/` - profile, income statement, ratios, DCF
//! - `analysis/` - multi-endpoint valuation and health analyses
//! - `common` - argument parsing, record access and formatting helpers

pub mod analysis;
pub mod common;
pub mod fundamentals;
pub mod market;

use std::sync::Arc;

use crate::core::upstream::FinancialDataSource;
use crate::domains::tools::FinancialService;

pub use analysis::{AdvancedFinancialHealthService, EnhancedDcfService};
pub use fundamentals::{
    CompanyProfileService, DcfValuationService, FinancialRatiosService, IncomeStatementService,
};
pub use market::{
    HistoricalPricesService, MarketIndicesService, StockQuoteService, TechnicalIndicatorsService,
    TradingVolumeService,
};

/// Every tool, in listing order, sharing one data source.
pub fn all_services(source: Arc<dyn FinancialDataSource>) -> Vec<Arc<dyn FinancialService>> {
    vec![
        Arc::new(CompanyProfileService::new(source.clone())),
        Arc::new(IncomeStatementService::new(source.clone())),
        Arc::new(StockQuoteService::new(source.clone())),
        Arc::new(HistoricalPricesService::new(source.clone())),
        Arc::new(MarketIndicesService::new(source.clone())),
        Arc::new(TradingVolumeService::new(source.clone())),
        Arc::new(FinancialRatiosService::new(source.clone())),
        Arc::new(DcfValuationService::new(source.clone())),
        Arc::new(TechnicalIndicatorsService::new(source.clone())),
        Arc::new(EnhancedDcfService::new(source.clone())),
        Arc::new(AdvancedFinancialHealthService::new(source)),
    ]
}
