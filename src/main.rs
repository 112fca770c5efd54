//! MCP Server Entry Point
//!
//! This is the main entry point for the MCP server. It loads configuration,
//! applies command-line overrides, validates the result, initializes logging
//! and starts the server with the configured transport.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{Level, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use fmp_mcp_server::core::{Config, FmpClient, McpServer, TransportConfig, TransportService};

#[derive(Parser, Debug)]
#[command(name = "fmp-mcp-server", version)]
#[command(about = "MCP server exposing Financial Modeling Prep data and analyses")]
struct Cli {
    /// Transport to serve on
    #[arg(long, env = "MCP_TRANSPORT", value_enum, ignore_case = true)]
    transport: Option<TransportKind>,

    /// HTTP bind host
    #[arg(long, env = "MCP_HTTP_HOST")]
    host: Option<String>,

    /// HTTP port
    #[arg(long, env = "MCP_HTTP_PORT")]
    port: Option<u16>,

    /// Allow binding the HTTP transport to a non-loopback address
    #[arg(long, env = "MCP_HTTP_ALLOW_REMOTE")]
    allow_remote: bool,

    /// Directory holding services/, resources.json and prompts.json
    ///
    /// Defaults to the schema/ directory of the source tree the binary was
    /// built from. An installed binary needs this option or MCP_SCHEMA_DIR.
    #[arg(long, env = "MCP_SCHEMA_DIR")]
    schema_dir: Option<PathBuf>,

    /// Log level filter (trace, debug, info, warn, error)
    #[arg(long, env = "MCP_LOG_LEVEL")]
    log_level: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TransportKind {
    Stdio,
    Http,
}

impl Cli {
    /// Override `config` with every option given on the command line.
    ///
    /// Returns the HTTP-only options that were given while another transport
    /// is selected; they have no effect.
    fn apply(self, config: &mut Config) -> Result<Vec<&'static str>> {
        if let Some(kind) = self.transport {
            let current = std::mem::take(&mut config.transport);
            config.transport = select_transport(kind, current)?;
        }
        if let Some(dir) = self.schema_dir {
            config.schema.dir = dir;
        }
        if let Some(level) = self.log_level {
            config.logging.level = level;
        }

        #[cfg(feature = "http")]
        if let TransportConfig::Http(http) = &mut config.transport {
            if let Some(host) = self.host {
                http.host = host;
            }
            if let Some(port) = self.port {
                http.port = port;
            }
            http.allow_remote |= self.allow_remote;
            return Ok(Vec::new());
        }

        let mut ignored = Vec::new();
        if self.host.is_some() {
            ignored.push("--host (MCP_HTTP_HOST)");
        }
        if self.port.is_some() {
            ignored.push("--port (MCP_HTTP_PORT)");
        }
        if self.allow_remote {
            ignored.push("--allow-remote (MCP_HTTP_ALLOW_REMOTE)");
        }
        Ok(ignored)
    }
}

/// Switch transports, keeping environment-derived HTTP settings when present.
fn select_transport(kind: TransportKind, current: TransportConfig) -> Result<TransportConfig> {
    match kind {
        #[cfg(feature = "stdio")]
        TransportKind::Stdio => Ok(TransportConfig::Stdio),
        #[cfg(feature = "http")]
        TransportKind::Http => {
            #[allow(unreachable_patterns)]
            let config = match current {
                TransportConfig::Http(http) => TransportConfig::Http(http),
                _ => TransportConfig::Http(Default::default()),
            };
            Ok(config)
        }
        #[allow(unreachable_patterns)]
        other => anyhow::bail!("{other:?} transport is not enabled in this build"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Environment (and .env) first, then command-line overrides
    let mut config = Config::from_env();
    let ignored = Cli::parse().apply(&mut config)?;

    // Initialize logging
    init_logging(&config.logging.level);

    for option in ignored {
        warn!(
            "{} only applies to the HTTP transport and is ignored with {}",
            option,
            config.transport.name()
        );
    }

    config.validate().context("Invalid configuration")?;

    info!("Starting {} v{}", config.server.name, config.server.version);

    let client = FmpClient::new(&config.upstream, config.api_key()?)
        .context("Failed to create the Financial Modeling Prep client")?;

    // Create the MCP server
    let server = McpServer::new(config.clone(), Arc::new(client))
        .context("Failed to load tool schemas")?;

    info!("Server initialized with {} tools", server.tool_count());

    // Create and run the transport service
    let transport = TransportService::new(config.transport);
    transport.run(server).await?;

    info!("Server shutting down");

    Ok(())
}

/// Initialize the logging subsystem.
///
/// Logs go to stderr; stdout carries the stdio protocol.
fn init_logging(level: &str) {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();
}
