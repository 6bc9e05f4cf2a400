//! MCP server implementation.

use super::protocol::*;
use super::tools::{self, get_tools, AnalysisArgs, TranscriptArgs, UpdateVideoArgs, UploadTranscriptArgs, VideoArgs};
use crate::artifacts::ArtifactStore;
use crate::config::Settings;
use crate::error::VimeoError;
use crate::vimeo::{ListVideosParams, VimeoClient};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};

const PROTOCOL_VERSION: &str = "2024-11-05";
const SERVER_NAME: &str = "vimeo-mcp";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

const NO_CREDENTIALS: &str = "Vimeo credentials not configured. Set VIMEO_ACCESS_TOKEN, or both \
VIMEO_CLIENT_ID and VIMEO_CLIENT_SECRET, or add them to the config file.";

/// MCP server exposing one Vimeo account.
pub struct McpServer {
    settings: Settings,
    client: Option<VimeoClient>,
}

impl McpServer {
    /// Create a server; the client is only built when credentials are configured.
    pub fn new(settings: Settings) -> Self {
        let client = match VimeoClient::from_settings(&settings) {
            Ok(client) => Some(client),
            Err(e) => {
                warn!("Vimeo client unavailable: {}", e);
                None
            }
        };
        Self { settings, client }
    }

    /// Create a server around an existing client.
    pub fn with_client(settings: Settings, client: VimeoClient) -> Self {
        Self {
            settings,
            client: Some(client),
        }
    }

    /// Run the MCP server (reads from stdin, writes to stdout).
    pub async fn run(&self) -> anyhow::Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdout = tokio::io::stdout();

        info!("Vimeo MCP server running on stdio");

        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }

            let response = match serde_json::from_str::<JsonRpcRequest>(&line) {
                Ok(request) => self.handle_request(request).await,
                Err(e) => {
                    warn!("Failed to parse request: {}", e);
                    Some(JsonRpcResponse::error(None, PARSE_ERROR, "Parse error"))
                }
            };

            if let Some(response) = response {
                let mut out = serde_json::to_string(&response)?;
                out.push('\n');
                stdout.write_all(out.as_bytes()).await?;
                stdout.flush().await?;
            }
        }

        info!("stdin closed, shutting down");
        Ok(())
    }

    /// Handle a single JSON-RPC message. Notifications yield no response.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        debug!(method = %request.method, "Request");

        if request.is_notification() {
            return None;
        }

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(request.id, request.params),
            "initialized" => JsonRpcResponse::success(request.id, json!({})),
            "ping" => JsonRpcResponse::success(request.id, json!({})),
            "tools/list" => {
                JsonRpcResponse::success_with(request.id, &ToolsListResult { tools: get_tools() })
            }
            "tools/call" => self.handle_tools_call(request.id, request.params).await,
            _ => JsonRpcResponse::error(
                request.id,
                METHOD_NOT_FOUND,
                &format!("Method not found: {}", request.method),
            ),
        };
        Some(response)
    }

    fn handle_initialize(&self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        let params: InitializeParams = params
            .and_then(|p| serde_json::from_value(p).ok())
            .unwrap_or_default();
        if let Some(client) = &params.client_info {
            info!(
                client = %client.name,
                version = client.version.as_deref().unwrap_or("?"),
                protocol = params.protocol_version.as_deref().unwrap_or("?"),
                "Client connected"
            );
        }

        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: ToolsCapability { list_changed: false },
            },
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: SERVER_VERSION.to_string(),
            },
        };

        JsonRpcResponse::success_with(id, &result)
    }

    async fn handle_tools_call(&self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        let params: ToolCallParams = match params {
            Some(p) => match serde_json::from_value(p) {
                Ok(params) => params,
                Err(e) => {
                    return JsonRpcResponse::error(id, INVALID_PARAMS, &format!("Invalid params: {}", e))
                }
            },
            None => return JsonRpcResponse::error(id, INVALID_PARAMS, "Missing params"),
        };

        let result = self.call_tool(&params.name, params.arguments).await;
        JsonRpcResponse::success_with(id, &result)
    }

    /// Dispatch one tool call.
    pub async fn call_tool(&self, name: &str, arguments: Option<Value>) -> ToolCallResult {
        if name == tools::HEALTH_CHECK {
            return ToolCallResult::text(pretty(&self.health_check().await));
        }

        let Some(client) = &self.client else {
            return ToolCallResult::error(NO_CREDENTIALS.to_string());
        };

        let outcome = match name {
            tools::VALIDATE_VIDEO => match parse_args::<VideoArgs>(arguments) {
                Ok(args) => client.validate_video(&args.video_id).await.map(|result| {
                    format!(
                        "Video {} validated successfully. Result: {}",
                        args.video_id,
                        pretty(&result)
                    )
                }),
                Err(e) => return e,
            },
            tools::LIST_VIDEOS_MINIMAL => match parse_args::<ListVideosParams>(arguments) {
                Ok(params) => client.list_videos_minimal(&params).await.map(|v| pretty(&v)),
                Err(e) => return e,
            },
            tools::LIST_VIDEOS => match parse_args::<ListVideosParams>(arguments) {
                Ok(params) => client.list_videos(&params).await.map(|v| pretty(&v)),
                Err(e) => return e,
            },
            tools::GET_VIDEO_DETAILS => match parse_args::<VideoArgs>(arguments) {
                Ok(args) => client.get_video_details(&args.video_id).await.map(|v| pretty(&v)),
                Err(e) => return e,
            },
            tools::GET_VIDEO_STATS => match parse_args::<VideoArgs>(arguments) {
                Ok(args) => client.get_video_stats(&args.video_id).await.map(|v| pretty(&v)),
                Err(e) => return e,
            },
            tools::UPDATE_VIDEO => match parse_args::<UpdateVideoArgs>(arguments) {
                Ok(args) => client
                    .update_video(&args.video_id, &args.update)
                    .await
                    .map(|report| {
                        format!(
                            "{}\n\nCurrent video details:\n{}",
                            report.summary(),
                            pretty(&report.video)
                        )
                    }),
                Err(e) => return e,
            },
            tools::DOWNLOAD_TRANSCRIPT => match parse_args::<TranscriptArgs>(arguments) {
                Ok(args) => {
                    client
                        .download_transcript(&args.video_id, &args.language, args.format)
                        .await
                }
                Err(e) => return e,
            },
            tools::UPLOAD_TRANSCRIPT => match parse_args::<UploadTranscriptArgs>(arguments) {
                Ok(args) => client
                    .upload_transcript(&args.video_id, &args.content, &args.language, args.format)
                    .await
                    .map(|_| {
                        format!(
                            "Transcript uploaded successfully for video {} in {}.",
                            args.video_id, args.language
                        )
                    }),
                Err(e) => return e,
            },
            tools::DOWNLOAD_TRANSCRIPT_TO_FILE => match parse_args::<TranscriptArgs>(arguments) {
                Ok(args) => {
                    let store = ArtifactStore::from_settings(&self.settings, args.base_path.as_deref());
                    client
                        .download_transcript_to_file(&args.video_id, &args.language, args.format, &store)
                        .await
                        .map(|path| format!("Transcript downloaded successfully to: {}", path.display()))
                }
                Err(e) => return e,
            },
            tools::GENERATE_CONTENT_ANALYSIS => match parse_args::<AnalysisArgs>(arguments) {
                Ok(args) => {
                    let store = ArtifactStore::from_settings(&self.settings, args.base_path.as_deref());
                    client
                        .generate_content_analysis_file(&args.video_id, &store)
                        .await
                        .map(|path| {
                            format!(
                                "Content analysis and suggestions generated successfully to: {}",
                                path.display()
                            )
                        })
                }
                Err(e) => return e,
            },
            _ => return ToolCallResult::error(format!("Unknown tool: {}", name)),
        };

        match outcome {
            Ok(text) => ToolCallResult::text(text),
            Err(e) => {
                error!(tool = name, "Tool failed: {}", e);
                ToolCallResult::error(error_text(&e))
            }
        }
    }

    /// Server status plus a live connectivity probe.
    pub async fn health_check(&self) -> Value {
        let vimeo = &self.settings.vimeo;
        let mut status = json!({
            "server": "Vimeo MCP Server",
            "version": SERVER_VERSION,
            "status": "healthy",
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "credentials": {
                "access_token": vimeo.access_token.is_some(),
                "client_id": vimeo.client_id.is_some(),
                "client_secret": vimeo.client_secret.is_some(),
            },
            "connection": "unknown",
        });

        let (state, connection) = match &self.client {
            Some(client) => {
                let result = client.ping().await;
                if let Some(secs) = client.rate_limit().remaining() {
                    status["rate_limited_for_secs"] = json!(secs);
                }
                match result {
                    Ok(()) => ("healthy", "connected"),
                    Err(e) => {
                        warn!("Health check failed: {}", e);
                        ("degraded", "failed")
                    }
                }
            }
            None => ("error", "no_credentials"),
        };
        status["status"] = json!(state);
        status["connection"] = json!(connection);
        status
    }
}

/// Deserialize tool arguments; a missing argument object counts as empty.
fn parse_args<T: DeserializeOwned>(arguments: Option<Value>) -> Result<T, ToolCallResult> {
    serde_json::from_value(arguments.unwrap_or_else(|| json!({})))
        .map_err(|e| ToolCallResult::error(format!("Invalid arguments: {}", e)))
}

/// Text shown to the assistant for a failed tool call.
fn error_text(err: &VimeoError) -> String {
    match err {
        VimeoError::RateLimited { retry_after_secs } => format!(
            "Rate limit exceeded. Please wait {} seconds before retrying.",
            retry_after_secs
        ),
        VimeoError::Api { message, .. } => format!("Vimeo API error: {}", message),
        VimeoError::TagsPartiallyApplied { .. } => format!("Vimeo API error: {}", err),
        VimeoError::InvalidInput(msg) => msg.clone(),
        other => format!("Error: {}", other),
    }
}

fn pretty<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("<unencodable result: {}>", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vimeo::testing::{client, ScriptedTransport};
    use crate::vimeo::TransportError;
    use reqwest::header::{HeaderMap, HeaderValue};

    fn request(id: Option<i64>, method: &str, params: Value) -> JsonRpcRequest {
        JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            id: id.map(Value::from),
            method: method.to_string(),
            params: Some(params),
        }
    }

    fn server(transport: &std::sync::Arc<ScriptedTransport>) -> McpServer {
        McpServer::with_client(Settings::default(), client(transport))
    }

    #[tokio::test]
    async fn test_initialize_and_list() {
        let server = server(&ScriptedTransport::new(vec![]));

        let response = server
            .handle_request(request(
                Some(1),
                "initialize",
                json!({ "protocolVersion": "2024-11-05", "clientInfo": { "name": "test" } }),
            ))
            .await
            .unwrap();
        let result = response.result.unwrap();
        assert_eq!(result["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(result["serverInfo"]["name"], "vimeo-mcp");

        let response = server
            .handle_request(request(Some(2), "tools/list", json!({})))
            .await
            .unwrap();
        assert_eq!(response.result.unwrap()["tools"].as_array().unwrap().len(), 11);
    }

    #[tokio::test]
    async fn test_notifications_get_no_response() {
        let server = server(&ScriptedTransport::new(vec![]));
        assert!(server
            .handle_request(request(None, "notifications/initialized", json!({})))
            .await
            .is_none());
        assert!(server
            .handle_request(request(Some(3), "notifications/cancelled", json!({})))
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let server = server(&ScriptedTransport::new(vec![]));
        let response = server
            .handle_request(request(Some(4), "resources/list", json!({})))
            .await
            .unwrap();
        assert_eq!(response.error.unwrap().code, METHOD_NOT_FOUND);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_text() {
        let mut headers = HeaderMap::new();
        headers.insert("retry-after", HeaderValue::from_static("30"));
        let transport = ScriptedTransport::new(vec![Err(TransportError::Status {
            status: 429,
            message: "Too many requests".to_string(),
            headers,
        })]);
        let server = server(&transport);

        let result = server
            .call_tool(tools::GET_VIDEO_STATS, Some(json!({ "video_id": "1" })))
            .await;
        assert_eq!(result.is_error, Some(true));
        assert_eq!(
            result.first_text(),
            "Rate limit exceeded. Please wait 30 seconds before retrying."
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_health_check_reports_cooldown() {
        let mut headers = HeaderMap::new();
        headers.insert("retry-after", HeaderValue::from_static("45"));
        let transport = ScriptedTransport::new(vec![Err(TransportError::Status {
            status: 429,
            message: "Too many requests".to_string(),
            headers,
        })]);
        let server = server(&transport);

        let health = server.health_check().await;
        assert_eq!(health["status"], "degraded");
        assert_eq!(health["connection"], "failed");
        assert_eq!(health["rate_limited_for_secs"], 45);

        // Still cooling down: no second request goes out.
        tokio::time::advance(std::time::Duration::from_secs(15)).await;
        let health = server.health_check().await;
        assert_eq!(health["rate_limited_for_secs"], 30);
        assert_eq!(transport.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_api_error_text() {
        let transport = ScriptedTransport::new(vec![Err(TransportError::status(
            404,
            "The requested video couldn't be found.",
        ))]);
        let result = server(&transport)
            .call_tool(tools::GET_VIDEO_DETAILS, Some(json!({ "video_id": "1" })))
            .await;
        assert_eq!(result.is_error, Some(true));
        assert_eq!(
            result.first_text(),
            "Vimeo API error: The requested video couldn't be found."
        );
    }

    #[tokio::test]
    async fn test_invalid_arguments() {
        let transport = ScriptedTransport::new(vec![]);
        let server = server(&transport);

        let result = server.call_tool(tools::GET_VIDEO_STATS, None).await;
        assert_eq!(result.is_error, Some(true));
        assert!(result.first_text().starts_with("Invalid arguments"));

        let result = server.call_tool(tools::VALIDATE_VIDEO, Some(json!({}))).await;
        assert!(result.first_text().starts_with("Invalid arguments"));

        let result = server.call_tool("vimeo_delete_everything", None).await;
        assert_eq!(result.first_text(), "Unknown tool: vimeo_delete_everything");
        assert!(transport.recorded().is_empty());
    }

    #[tokio::test]
    async fn test_download_transcript_tool() {
        let transport = ScriptedTransport::new(vec![
            Ok(json!({ "data": [{ "uri": "/videos/1/texttracks/2", "language": "en-x-autogen" }] })),
            Ok(Value::String("WEBVTT\n\n00:00:00.000 --> 00:00:01.000\nHi\n".to_string())),
        ]);
        let result = server(&transport)
            .call_tool(
                tools::DOWNLOAD_TRANSCRIPT,
                Some(json!({ "video_id": "1", "format": "srt" })),
            )
            .await;
        assert_eq!(result.is_error, None);
        assert_eq!(result.first_text(), "1\n00:00:00,000 --> 00:00:01,000\nHi");
    }

    #[tokio::test]
    async fn test_health_check() {
        let transport = ScriptedTransport::new(vec![Ok(json!({ "data": [] }))]);
        let status = server(&transport).health_check().await;
        assert_eq!(status["status"], "healthy");
        assert_eq!(status["connection"], "connected");

        let offline = McpServer {
            settings: Settings::default(),
            client: None,
        };
        let result = offline.call_tool(tools::HEALTH_CHECK, None).await;
        let status: Value = serde_json::from_str(result.first_text()).unwrap();
        assert_eq!(status["status"], "error");
        assert_eq!(status["connection"], "no_credentials");

        let result = offline.call_tool(tools::LIST_VIDEOS, None).await;
        assert_eq!(result.first_text(), NO_CREDENTIALS);
    }
}
