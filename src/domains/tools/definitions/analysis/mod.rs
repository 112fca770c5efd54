//! Composite analysis tools built from several provider endpoints.

pub mod enhanced_dcf;
pub mod health;

pub use enhanced_dcf::EnhancedDcfService;
pub use health::AdvancedFinancialHealthService;
