//! Company fundamentals tools.

pub mod dcf;
pub mod income;
pub mod profile;
pub mod ratios;

pub use dcf::DcfValuationService;
pub use income::IncomeStatementService;
pub use profile::CompanyProfileService;
pub use ratios::FinancialRatiosService;
