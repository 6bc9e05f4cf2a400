//! MCP command implementation.

use crate::config::Settings;
use crate::mcp::McpServer;
use anyhow::Result;

/// Run the MCP server on stdio until stdin closes.
pub async fn run_mcp(settings: Settings) -> Result<()> {
    McpServer::new(settings).run().await
}
