//! Financial Modeling Prep MCP Server Library
//!
//! This crate exposes Financial Modeling Prep market data, company
//! fundamentals and valuation analyses as Model Context Protocol tools.
//!
//! # Architecture
//!
//! The server is organized into the following modules:
//!
//! - **core**: Configuration, error handling, schema loading, the upstream
//!   data client, the request handler and the transports
//! - **domains**: Business logic organized by bounded contexts
//!   - **tools**: The financial tools, their registry and argument validation
//!   - **resources**: The static resource catalog
//!   - **prompts**: The static prompt catalog
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use fmp_mcp_server::core::{Config, FmpClient, McpServer, TransportService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     config.validate()?;
//!     let client = FmpClient::new(&config.upstream, config.api_key()?)?;
//!     let server = McpServer::new(config.clone(), Arc::new(client))?;
//!     TransportService::new(config.transport).run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
