//! HTTP transport for the MCP server.
//!
//! Each `POST /mcp` carries one JSON-RPC message and gets its response in the
//! body; notifications are acknowledged with `202 Accepted`.

use crate::cli::Output;
use crate::config::Settings;
use crate::mcp::{JsonRpcRequest, JsonRpcResponse, McpServer, PARSE_ERROR};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

/// Run the HTTP server.
pub async fn run_serve(host: &str, port: u16, settings: Settings) -> anyhow::Result<()> {
    let server = Arc::new(McpServer::new(settings));

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("Vimeo MCP Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET  /health");
    Output::kv("JSON-RPC", "POST /mcp");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, router(server)).await?;

    Ok(())
}

fn router(server: Arc<McpServer>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/mcp", post(mcp))
        .layer(cors)
        .with_state(server)
}

// === Handlers ===

async fn health(State(server): State<Arc<McpServer>>) -> impl IntoResponse {
    Json(server.health_check().await)
}

async fn mcp(State(server): State<Arc<McpServer>>, body: String) -> Response {
    let request = match serde_json::from_str::<JsonRpcRequest>(&body) {
        Ok(request) => request,
        Err(e) => {
            warn!("Failed to parse request: {}", e);
            return (
                StatusCode::BAD_REQUEST,
                Json(JsonRpcResponse::error(None, PARSE_ERROR, "Parse error")),
            )
                .into_response();
        }
    };

    match server.handle_request(request).await {
        Some(response) => Json(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}
