//! Market data tools.
//!
//! - `quote`: current price and ranges
//! - `historical`: daily OHLCV history
//! - `indices`: major market indices
//! - `volume`: trading volume against the average
//! - `technical`: technical indicator series

pub mod historical;
pub mod indices;
pub mod quote;
pub mod technical;
pub mod volume;

pub use historical::HistoricalPricesService;
pub use indices::MarketIndicesService;
pub use quote::StockQuoteService;
pub use technical::TechnicalIndicatorsService;
pub use volume::TradingVolumeService;
