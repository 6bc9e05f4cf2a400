//! Vimeo account client.

use super::rate_limit::RateLimitGuard;
use super::transport::{ApiRequest, HttpTransport, Transport};
use super::types::{parse_video_id, ListVideosParams};
use crate::config::Settings;
use crate::error::Result;
use crate::response::{shape_list, ResponseMode};
use reqwest::Method;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Field projection requested for video details.
pub const DETAIL_FIELDS: &str = "uri,name,description,duration,created_time,modified_time,privacy,\
pictures,tags,stats.plays,metadata.connections.comments.total,metadata.connections.likes.total";

/// Default and maximum page size for one response mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub default: u32,
    pub max: u32,
}

impl PageLimits {
    pub const MINIMAL: PageLimits = PageLimits { default: 10, max: 20 };
    pub const COMPACT: PageLimits = PageLimits { default: 10, max: 15 };
    pub const FULL: PageLimits = PageLimits { default: 6, max: 8 };

    pub fn for_mode(mode: &ResponseMode) -> Self {
        match mode {
            ResponseMode::Minimal => Self::MINIMAL,
            ResponseMode::Full => Self::FULL,
            ResponseMode::Compact | ResponseMode::Custom(_) => Self::COMPACT,
        }
    }

    /// Requested size, defaulted and clamped to `1..=max`.
    pub fn clamp(&self, requested: Option<u32>) -> u32 {
        requested.unwrap_or(self.default).clamp(1, self.max)
    }
}

/// Client for one Vimeo account.
///
/// Every API call passes through the client's [`RateLimitGuard`], so a 429 seen
/// by any operation pauses all of them.
#[derive(Clone)]
pub struct VimeoClient {
    pub(super) transport: Arc<dyn Transport>,
    pub(super) rate_limit: Arc<RateLimitGuard>,
}

impl VimeoClient {
    /// Create a client over an arbitrary transport.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            rate_limit: Arc::new(RateLimitGuard::new()),
        }
    }

    /// Create a client talking HTTP with the configured credentials.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let credentials = settings.credentials()?;
        let transport = HttpTransport::new(&settings.vimeo, credentials)?;
        Ok(Self::new(Arc::new(transport)))
    }

    /// The cooldown state shared by all calls of this client.
    pub fn rate_limit(&self) -> &RateLimitGuard {
        &self.rate_limit
    }

    /// One guarded API call.
    pub(crate) async fn api(&self, request: ApiRequest) -> Result<Value> {
        self.rate_limit.run(|| self.transport.call(request)).await
    }

    /// List the account's videos, shaped by the requested response mode.
    ///
    /// Compact mode is the default; `compact: false` returns sanitised full
    /// objects and custom `fields` override either.
    #[instrument(skip(self, params))]
    pub async fn list_videos(&self, params: &ListVideosParams) -> Result<Value> {
        let base = if params.compact.unwrap_or(true) {
            ResponseMode::Compact
        } else {
            ResponseMode::Full
        };
        let limits = PageLimits::for_mode(&base);
        let mode = ResponseMode::select(base, params.fields.clone());
        self.list_with_mode(params, mode, limits).await
    }

    /// List videos with only the minimal projection.
    #[instrument(skip(self, params))]
    pub async fn list_videos_minimal(&self, params: &ListVideosParams) -> Result<Value> {
        self.list_with_mode(params, ResponseMode::Minimal, PageLimits::MINIMAL)
            .await
    }

    async fn list_with_mode(
        &self,
        params: &ListVideosParams,
        mode: ResponseMode,
        limits: PageLimits,
    ) -> Result<Value> {
        let per_page = limits.clamp(params.per_page);

        let mut query = Map::new();
        query.insert("page".to_string(), json!(params.page.unwrap_or(1).max(1)));
        query.insert("per_page".to_string(), json!(per_page));
        if let Some(q) = params.query.as_deref().filter(|q| !q.is_empty()) {
            query.insert("query".to_string(), json!(q));
        }
        if let Some(sort) = params.sort {
            query.insert("sort".to_string(), serde_json::to_value(sort)?);
        }
        if let Some(direction) = params.direction {
            query.insert("direction".to_string(), serde_json::to_value(direction)?);
        }

        debug!(mode = %mode, per_page, "Listing videos");
        let page = self
            .api(ApiRequest::get("/me/videos").with_params(Value::Object(query)))
            .await?;

        Ok(shape_list(page, &mode, params.per_page, limits.max))
    }

    /// Metadata and basic statistics for one video.
    #[instrument(skip(self))]
    pub async fn get_video_details(&self, video_id: &str) -> Result<Value> {
        let id = parse_video_id(video_id)?;
        self.api(
            ApiRequest::get(format!("/videos/{}", id)).with_params(json!({ "fields": DETAIL_FIELDS })),
        )
        .await
    }

    /// Play statistics for one video.
    #[instrument(skip(self))]
    pub async fn get_video_stats(&self, video_id: &str) -> Result<Value> {
        let id = parse_video_id(video_id)?;
        self.api(ApiRequest::get(format!("/videos/{}/stats", id))).await
    }

    /// Validate a video; some screen recordings reject edits until this is done.
    #[instrument(skip(self))]
    pub async fn validate_video(&self, video_id: &str) -> Result<Value> {
        let id = parse_video_id(video_id)?;
        self.api(
            ApiRequest::new(Method::PUT, format!("/videos/{}/validate", id)).with_params(json!({})),
        )
        .await
    }

    /// Cheapest authenticated call, used to probe connectivity.
    pub async fn ping(&self) -> Result<()> {
        self.api(
            ApiRequest::get("/me/videos").with_params(json!({ "page": 1, "per_page": 1, "fields": "uri" })),
        )
        .await
        .map(|_| ())
    }
}
