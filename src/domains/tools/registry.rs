//! Tool Registry - central registration and dispatch for all tools.
//!
//! This module provides:
//! - A registry of all available tools, each paired with its input schema
//! - Argument validation ahead of any provider I/O
//! - Tool metadata for listing
//!
//! Both transports dispatch through [`ToolRegistry::invoke`].

use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

use rmcp::model::{JsonObject, Tool};

use crate::core::error::{Error, Result};
use crate::core::schema::{SchemaLoader, ToolSchema};
use crate::core::upstream::FinancialDataSource;

use super::definitions::all_services;
use super::error::{ToolError, ToolFailure};
use super::handlers::{FinancialService, ToolInput, ToolOutput};
use super::validation::validate_arguments;

// ============================================================================
// Tool Registry
// ============================================================================

struct RegisteredTool {
    service: Arc<dyn FinancialService>,
    schema: ToolSchema,
}

/// Tool registry - manages all available tools.
///
/// Immutable after construction and safe to share between concurrent calls.
pub struct ToolRegistry {
    tools: Vec<RegisteredTool>,
}

impl ToolRegistry {
    /// Register every tool against `source`, loading schemas through `loader`.
    pub fn new(source: Arc<dyn FinancialDataSource>, loader: &SchemaLoader) -> Result<Self> {
        Self::from_services(all_services(source), loader)
    }

    /// Register an explicit service list.
    ///
    /// Fails on duplicate names and on any service without a valid schema.
    pub fn from_services(
        services: Vec<Arc<dyn FinancialService>>,
        loader: &SchemaLoader,
    ) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut tools = Vec::with_capacity(services.len());

        for service in services {
            let name = service.name();
            if !seen.insert(name) {
                return Err(Error::config(format!("Duplicate tool name: {name}")));
            }
            let schema = loader.load_service_schema(name)?;
            debug!("Registered tool {}", name);
            tools.push(RegisteredTool { service, schema });
        }

        info!(
            "Tool registry ready with {} tools (schemas from {})",
            tools.len(),
            loader.schema_dir().display()
        );
        Ok(Self { tools })
    }

    /// Get all tool names, in registration order.
    pub fn tool_names(&self) -> Vec<&'static str> {
        self.tools.iter().map(|t| t.service.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Get all tools as Tool models (metadata).
    ///
    /// This is the single source of truth for all available tools.
    /// Both HTTP and STDIO transports use this to get tool metadata.
    pub fn list_tools(&self) -> Vec<Tool> {
        self.tools
            .iter()
            .map(|t| {
                Tool::new(
                    t.service.name(),
                    t.service.description(),
                    t.schema.document(),
                )
            })
            .collect()
    }

    /// Validate and execute a tool call.
    ///
    /// Unknown names and invalid arguments are rejected before any provider
    /// request is made.
    pub async fn invoke(
        &self,
        name: &str,
        arguments: &JsonObject,
    ) -> std::result::Result<String, ToolFailure> {
        let Some(tool) = self.find(name) else {
            warn!("Unknown tool requested: {}", name);
            return Err(ToolFailure::new(name, ToolError::not_found(name)));
        };

        validate_arguments(&tool.schema, arguments)
            .map_err(|e| ToolFailure::new(name, e))?;

        tool.service
            .run(arguments)
            .await
            .map_err(|e| ToolFailure::new(name, e))
    }

    /// Execute a call envelope, producing the response envelope.
    pub async fn handle(&self, input: ToolInput) -> ToolOutput {
        let result = self.invoke(&input.tool_name, &input.arguments).await;
        match &result {
            Ok(_) => debug!("Tool {} succeeded", input.tool_name),
            Err(failure) => warn!(kind = failure.kind(), "Tool call failed: {}", failure),
        }
        result.into()
    }

    fn find(&self, name: &str) -> Option<&RegisteredTool> {
        self.tools.iter().find(|t| t.service.name() == name)
    }
}
