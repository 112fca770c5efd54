//! Core module containing shared infrastructure components.
//!
//! This module provides the foundational building blocks for the MCP server:
//! configuration, error handling, schema loading, the upstream data client,
//! the request handler and the transport layer.

pub mod config;
pub mod error;
pub mod schema;
pub mod server;
pub mod transport;
pub mod upstream;

pub use config::Config;
pub use error::{Error, Result};
pub use schema::{SchemaError, SchemaLoader, ToolSchema};
pub use server::McpServer;
pub use transport::{TransportConfig, TransportService};
pub use upstream::{FinancialDataSource, FmpClient, UpstreamError};
