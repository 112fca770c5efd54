//! STDIO transport implementation.
//!
//! Standard input/output transport for MCP - the default and recommended mode.

use rmcp::ServiceExt;
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::info;

use super::{TransportError, TransportResult};
use crate::core::McpServer;

/// STDIO transport handler.
pub struct StdioTransport;

impl StdioTransport {
    /// Run the STDIO transport.
    pub async fn run(server: McpServer) -> TransportResult<()> {
        info!("Ready - communicating via stdin/stdout");
        Self::serve_io(server, tokio::io::stdin(), tokio::io::stdout()).await?;
        info!("STDIO transport finished");
        Ok(())
    }

    /// Serve one MCP conversation over an arbitrary byte stream pair.
    pub async fn serve_io<R, W>(server: McpServer, reader: R, writer: W) -> TransportResult<()>
    where
        R: AsyncRead + Send + Unpin + 'static,
        W: AsyncWrite + Send + Unpin + 'static,
    {
        let service = server
            .serve((reader, writer))
            .await
            .map_err(|e| TransportError::init(e.to_string()))?;

        service
            .waiting()
            .await
            .map_err(|e| TransportError::ServiceError(e.to_string()))?;

        Ok(())
    }
}
