//! HTTP request executor for the Vimeo API.
//!
//! Every call goes out exactly once; retries and rate limiting are left to the
//! caller (see [`super::RateLimitGuard`]).
//!
//! Request parameters always travel in a single `params` channel, whatever the
//! HTTP method. The official Vimeo bindings call this channel `query` and send it
//! as the query string for GET and as the JSON body for everything else. The
//! upstream API is built around that behaviour, so [`HttpTransport`] reproduces it
//! rather than splitting parameters by method at the call sites.

use crate::config::{Credentials, VimeoSettings};
use crate::error::{Result, VimeoError};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, ACCEPT, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, instrument};
use url::Url;

/// Media type pinning the API version the client is written against.
pub const API_ACCEPT: &str = "application/vnd.vimeo.*+json;version=3.4";

/// Endpoint exchanging client credentials for an unauthenticated app token.
const CLIENT_TOKEN_PATH: &str = "/oauth/authorize/client";

/// A single call against the API.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the API base (`/videos/1`) or an absolute URL.
    pub path: String,
    /// Query string for GET, JSON body otherwise.
    pub params: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            params: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn with_params(mut self, params: Value) -> Self {
        self.params = Some(params);
        self
    }
}

/// Failure of a single HTTP exchange.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The server answered with a non-2xx status.
    #[error("{message}")]
    Status {
        status: u16,
        message: String,
        headers: HeaderMap,
    },

    #[error("HTTP request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl TransportError {
    /// Build a status failure without headers.
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        TransportError::Status {
            status,
            message: message.into(),
            headers: HeaderMap::new(),
        }
    }

    /// HTTP status code, if the server produced one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Look up a response header on a status failure.
    pub fn header(&self, name: &str) -> Option<&str> {
        match self {
            TransportError::Status { headers, .. } => {
                headers.get(name).and_then(|v| v.to_str().ok())
            }
            _ => None,
        }
    }
}

/// Seam between the client and the network.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform one authenticated API call and return the parsed body.
    async fn call(&self, request: ApiRequest) -> std::result::Result<Value, TransportError>;

    /// Plain, unauthenticated GET of a direct download link.
    async fn fetch(&self, url: &str) -> std::result::Result<String, TransportError>;

    /// Authenticated PUT of raw content to an upload link.
    async fn upload(
        &self,
        url: &str,
        content: String,
        content_type: &str,
    ) -> std::result::Result<(), TransportError>;
}

/// reqwest-backed [`Transport`].
pub struct HttpTransport {
    client: reqwest::Client,
    api_base: Url,
    credentials: Credentials,
    /// App token obtained from client credentials, fetched once.
    app_token: Mutex<Option<String>>,
}

impl HttpTransport {
    /// Create a transport for the configured API base.
    pub fn new(settings: &VimeoSettings, credentials: Credentials) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(concat!("vimeo-mcp/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| VimeoError::Config(format!("Failed to create HTTP client: {}", e)))?;

        let api_base = Url::parse(&settings.api_base).map_err(|e| {
            VimeoError::Config(format!("Invalid API base URL '{}': {}", settings.api_base, e))
        })?;

        Ok(Self {
            client,
            api_base,
            credentials,
            app_token: Mutex::new(None),
        })
    }

    fn resolve(&self, path: &str) -> std::result::Result<Url, TransportError> {
        let parsed = if path.starts_with("http://") || path.starts_with("https://") {
            Url::parse(path)
        } else {
            self.api_base.join(path)
        };
        parsed.map_err(|e| TransportError::InvalidUrl(format!("{}: {}", path, e)))
    }

    async fn bearer_token(&self) -> std::result::Result<String, TransportError> {
        let (client_id, client_secret) = match &self.credentials {
            Credentials::AccessToken(token) => return Ok(token.clone()),
            Credentials::ClientCredentials {
                client_id,
                client_secret,
            } => (client_id, client_secret),
        };

        let mut cached = self.app_token.lock().await;
        if let Some(token) = cached.as_ref() {
            return Ok(token.clone());
        }

        debug!("Exchanging client credentials for an app token");
        let response = self
            .client
            .post(self.resolve(CLIENT_TOKEN_PATH)?)
            .basic_auth(client_id, Some(client_secret))
            .header(ACCEPT, API_ACCEPT)
            .json(&json!({ "grant_type": "client_credentials", "scope": "public" }))
            .send()
            .await?;

        let body = read_body(response).await?;
        let token = body
            .get("access_token")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                TransportError::Decode("token response did not include an access_token".to_string())
            })?
            .to_string();

        *cached = Some(token.clone());
        Ok(token)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    async fn call(&self, request: ApiRequest) -> std::result::Result<Value, TransportError> {
        let url = self.resolve(&request.path)?;
        let token = self.bearer_token().await?;

        let mut builder = self
            .client
            .request(request.method.clone(), url)
            .header(ACCEPT, API_ACCEPT)
            .bearer_auth(token);

        if let Some(params) = &request.params {
            builder = if request.method == Method::GET {
                builder.query(&query_pairs(params))
            } else {
                builder.json(params)
            };
        }

        let response = builder.send().await?;
        debug!(status = %response.status(), "API response");
        read_body(response).await
    }

    #[instrument(skip(self))]
    async fn fetch(&self, url: &str) -> std::result::Result<String, TransportError> {
        let response = self.client.get(self.resolve(url)?).send().await?;
        let status = response.status();
        if !status.is_success() {
            let headers = response.headers().clone();
            return Err(TransportError::Status {
                status: status.as_u16(),
                message: reason(status),
                headers,
            });
        }
        Ok(response.text().await?)
    }

    #[instrument(skip(self, content), fields(bytes = content.len()))]
    async fn upload(
        &self,
        url: &str,
        content: String,
        content_type: &str,
    ) -> std::result::Result<(), TransportError> {
        let token = self.bearer_token().await?;
        let response = self
            .client
            .put(self.resolve(url)?)
            .bearer_auth(token)
            .header(CONTENT_TYPE, content_type)
            .body(content)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let headers = response.headers().clone();
            return Err(TransportError::Status {
                status: status.as_u16(),
                message: reason(status),
                headers,
            });
        }
        Ok(())
    }
}

/// Turn a response into a JSON value, or a status failure for non-2xx.
async fn read_body(response: reqwest::Response) -> std::result::Result<Value, TransportError> {
    let status = response.status();
    let headers = response.headers().clone();
    let is_json = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.contains("json"));
    let text = response.text().await?;

    if !status.is_success() {
        return Err(TransportError::Status {
            status: status.as_u16(),
            message: error_message(status, &text),
            headers,
        });
    }

    if text.trim().is_empty() {
        return Ok(Value::Null);
    }

    if is_json {
        serde_json::from_str(&text).map_err(|e| TransportError::Decode(e.to_string()))
    } else {
        Ok(Value::String(text))
    }
}

/// Pull the human-readable message out of a Vimeo error body.
fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .or_else(|| v.get("developer_message"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| format!("Vimeo API error ({})", status.as_u16()))
}

fn reason(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.as_u16().to_string())
}

/// Flatten a params object into query pairs. Arrays become comma lists.
fn query_pairs(params: &Value) -> Vec<(String, String)> {
    let Some(map) = params.as_object() else {
        return Vec::new();
    };

    map.iter()
        .filter(|(_, v)| !v.is_null())
        .map(|(k, v)| {
            let value = match v {
                Value::String(s) => s.clone(),
                Value::Array(items) => items
                    .iter()
                    .map(|i| i.as_str().map(str::to_string).unwrap_or_else(|| i.to_string()))
                    .collect::<Vec<_>>()
                    .join(","),
                other => other.to_string(),
            };
            (k.clone(), value)
        })
        .collect()
}
