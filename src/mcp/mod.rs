//! MCP (Model Context Protocol) server for a Vimeo account.
//!
//! Lets AI assistants list, inspect and edit videos and their captions as tools.
//! Implements JSON-RPC 2.0 over stdio; the `serve` command wraps the same
//! dispatcher in an HTTP endpoint.

mod protocol;
mod server;
mod tools;

pub use protocol::{JsonRpcRequest, JsonRpcResponse, PARSE_ERROR};
pub use server::McpServer;
