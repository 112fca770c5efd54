//! Tools domain module.
//!
//! This module handles all tool-related functionality for the MCP server.
//! Tools are the financial lookups and analyses clients can call.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual tool implementations (one file per tool)
//! - `handlers.rs` - The `FinancialService` contract and call envelopes
//! - `validation.rs` - Schema-driven argument validation
//! - `registry.rs` - Central tool registry and dispatch
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file in `definitions/` implementing `FinancialService`
//! 2. Add its input schema as `schema/services/<tool_name>.json`
//! 3. Add it to `definitions::all_services`

pub mod definitions;
mod error;
mod handlers;
mod registry;
pub mod validation;

pub use error::{ToolError, ToolFailure};
pub use handlers::*;
pub use registry::ToolRegistry;
