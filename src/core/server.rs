//! MCP Server implementation and lifecycle management.
//!
//! This module contains the main server handler that implements the MCP
//! protocol by delegating to domain-specific services. The same
//! [`McpServer::call_tool`] backs both transports, so a tool call returns an
//! identical payload over stdio and HTTP.

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler,
    model::*,
    service::RequestContext,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::config::Config;
use super::error::Result;
use super::schema::SchemaLoader;
use super::upstream::FinancialDataSource;
use crate::domains::{
    prompts::PromptService,
    resources::ResourceService,
    tools::{ToolInput, ToolRegistry},
};

/// The main MCP server handler.
///
/// This struct implements the `ServerHandler` trait from rmcp and coordinates
/// between different domain services to handle MCP protocol messages.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Registered tools and their schemas.
    tools: Arc<ToolRegistry>,

    /// Static resource catalog.
    resources: Arc<ResourceService>,

    /// Static prompt catalog.
    prompts: Arc<PromptService>,
}

impl McpServer {
    /// Build the server: load every schema and catalog, register all tools.
    ///
    /// Any missing or invalid schema document fails construction.
    pub fn new(config: Config, source: Arc<dyn FinancialDataSource>) -> Result<Self> {
        let loader = SchemaLoader::new(&config.schema.dir);

        let tools = ToolRegistry::new(source, &loader)?;
        let resources = ResourceService::load(&loader)?;
        let prompts = PromptService::load(&loader)?;

        Ok(Self {
            config: Arc::new(config),
            tools: Arc::new(tools),
            resources: Arc::new(resources),
            prompts: Arc::new(prompts),
        })
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Name of the configured transport.
    pub fn transport_name(&self) -> &'static str {
        self.config.transport.name()
    }

    pub fn tool_count(&self) -> usize {
        self.tools.len()
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    // ========================================================================
    // Shared by both transports
    // ========================================================================

    /// All tools in registration order.
    pub fn list_tools(&self) -> Vec<Tool> {
        self.tools.list_tools()
    }

    /// Validate and run a tool, wrapping the outcome in an MCP tool result.
    ///
    /// Tool failures never surface as protocol errors: they come back as a
    /// result with `isError` set and the descriptor in `structuredContent`.
    pub async fn call_tool(&self, name: &str, arguments: JsonObject) -> CallToolResult {
        self.tools
            .handle(ToolInput::new(name, arguments))
            .await
            .into_call_result()
    }

    pub fn list_resources(&self) -> Vec<Resource> {
        self.resources.list_resources()
    }

    pub fn list_prompts(&self) -> Vec<Prompt> {
        self.prompts.list_prompts()
    }
}

impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        let mut info = ServerInfo {
            instructions: Some(
                "Financial Modeling Prep data server. Provides company profiles, financial \
                 statements, quotes, price history, market indices, technical indicators, \
                 DCF valuation and financial health analyses."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .enable_prompts()
                .build(),
            ..Default::default()
        };
        info.server_info.name = self.name().to_string();
        info.server_info.version = self.version().to_string();
        info
    }

    #[instrument(skip(self, _context))]
    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListToolsResult, McpError> {
        info!("Listing tools");
        Ok(ListToolsResult {
            tools: McpServer::list_tools(self),
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, request, _context), fields(tool = %request.name))]
    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<CallToolResult, McpError> {
        info!("Calling tool");
        let arguments = request.arguments.unwrap_or_default();
        Ok(McpServer::call_tool(self, &request.name, arguments).await)
    }

    #[instrument(skip(self, _context))]
    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListResourcesResult, McpError> {
        info!("Listing resources");
        Ok(ListResourcesResult {
            resources: McpServer::list_resources(self),
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, _context))]
    async fn list_prompts(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListPromptsResult, McpError> {
        info!("Listing prompts");
        Ok(ListPromptsResult {
            prompts: McpServer::list_prompts(self),
            next_cursor: None,
            meta: None,
        })
    }
}
