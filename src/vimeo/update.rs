//! Video metadata updates.

use super::client::VimeoClient;
use super::transport::ApiRequest;
use super::types::{parse_video_id, VideoUpdate};
use crate::error::{Result, VimeoError};
use reqwest::Method;
use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::{debug, info, instrument, warn};

/// One way of writing a single metadata field.
///
/// Some videos (screen recordings in particular) reject PATCH for a while after
/// upload but accept PUT, so text fields are written with each strategy in
/// [`UpdateStrategy::ORDER`] until one succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStrategy {
    Patch,
    Put,
}

impl UpdateStrategy {
    pub const ORDER: [UpdateStrategy; 2] = [UpdateStrategy::Patch, UpdateStrategy::Put];

    fn method(self) -> Method {
        match self {
            UpdateStrategy::Patch => Method::PATCH,
            UpdateStrategy::Put => Method::PUT,
        }
    }
}

impl std::fmt::Display for UpdateStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UpdateStrategy::Patch => write!(f, "PATCH"),
            UpdateStrategy::Put => write!(f, "PUT"),
        }
    }
}

/// What happened to one requested field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldOutcome {
    Updated,
    Failed,
    NotProvided,
}

impl FieldOutcome {
    fn of<T>(requested: &Option<T>, result: &Result<()>) -> Self {
        match (requested, result) {
            (None, _) => FieldOutcome::NotProvided,
            (Some(_), Ok(())) => FieldOutcome::Updated,
            (Some(_), Err(_)) => FieldOutcome::Failed,
        }
    }
}

/// Per-field result of [`VimeoClient::update_video`].
#[derive(Debug, Clone, Serialize)]
pub struct UpdateReport {
    pub title: FieldOutcome,
    pub description: FieldOutcome,
    pub tags: FieldOutcome,
    pub privacy: FieldOutcome,
    pub errors: Vec<String>,
    /// Video details fetched after all updates ran.
    pub video: Value,
}

impl UpdateReport {
    /// Human-readable status lines, one per field, followed by any errors.
    pub fn summary(&self) -> String {
        let mut lines = vec!["Video update results:".to_string()];
        for (label, outcome) in [
            ("Title", self.title),
            ("Description", self.description),
            ("Tags", self.tags),
            ("Privacy", self.privacy),
        ] {
            lines.push(match outcome {
                FieldOutcome::Updated => format!("- {} updated", label),
                FieldOutcome::Failed => format!("- {} update failed", label),
                FieldOutcome::NotProvided => format!("- {} not provided", label),
            });
        }

        if !self.errors.is_empty() {
            lines.push(String::new());
            lines.push("Errors encountered:".to_string());
            lines.extend(self.errors.iter().cloned());
        }
        lines.join("\n")
    }
}

impl VimeoClient {
    /// Write one top-level field, trying each [`UpdateStrategy`] in order.
    ///
    /// The first success wins and the last failure is returned. A rate-limit
    /// failure ends the sequence immediately.
    #[instrument(skip(self, value))]
    pub async fn update_field(&self, video_id: &str, field: &str, value: &str) -> Result<Value> {
        let id = parse_video_id(video_id)?;
        let path = format!("/videos/{}", id);

        let mut body = Map::new();
        body.insert(field.to_string(), Value::from(value));
        let body = Value::Object(body);

        let mut last_error = None;
        for strategy in UpdateStrategy::ORDER {
            let request = ApiRequest::new(strategy.method(), path.as_str()).with_params(body.clone());
            match self.api(request).await {
                Ok(updated) => {
                    debug!(%strategy, field, "Field updated");
                    return Ok(updated);
                }
                Err(err @ VimeoError::RateLimited { .. }) => return Err(err),
                Err(err) => {
                    warn!(%strategy, field, error = %err, "Update attempt failed");
                    last_error = Some(err);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| VimeoError::InvalidInput("no update strategy ran".to_string())))
    }

    pub async fn update_title(&self, video_id: &str, title: &str) -> Result<Value> {
        self.update_field(video_id, "name", title).await
    }

    pub async fn update_description(&self, video_id: &str, description: &str) -> Result<Value> {
        self.update_field(video_id, "description", description).await
    }

    /// Change who can view a video.
    pub async fn update_privacy(&self, video_id: &str, view: super::Privacy) -> Result<Value> {
        let id = parse_video_id(video_id)?;
        self.api(
            ApiRequest::new(Method::PATCH, format!("/videos/{}", id))
                .with_params(json!({ "privacy": { "view": view } })),
        )
        .await
    }

    /// Apply every field of `update`, each independently.
    ///
    /// The video is validated first; a failed validation is logged and the
    /// update continues. Field failures are collected into the report rather
    /// than aborting the remaining fields.
    #[instrument(skip(self, update))]
    pub async fn update_video(&self, video_id: &str, update: &VideoUpdate) -> Result<UpdateReport> {
        let id = parse_video_id(video_id)?;

        match self.validate_video(&id).await {
            Ok(_) => debug!("Video validated"),
            Err(err) => warn!(error = %err, "Validation failed, continuing with update"),
        }

        let mut errors = Vec::new();
        let mut record = |label: &str, result: Result<()>| {
            if let Err(err) = &result {
                warn!(field = label, error = %err, "Field update failed");
                errors.push(format!("{} update failed: {}", label, err));
            }
            result
        };

        // Empty text counts as not provided.
        let requested_title = update.title.as_deref().filter(|t| !t.is_empty());
        let requested_description = update.description.as_deref().filter(|d| !d.is_empty());

        let title = match requested_title {
            Some(title) => record("Title", self.update_title(&id, title).await.map(|_| ())),
            None => Ok(()),
        };
        let description = match requested_description {
            Some(description) => record(
                "Description",
                self.update_description(&id, description).await.map(|_| ()),
            ),
            None => Ok(()),
        };
        let privacy = match update.privacy {
            Some(view) => record("Privacy", self.update_privacy(&id, view).await.map(|_| ())),
            None => Ok(()),
        };
        let tags = match &update.tags {
            Some(tags) => record("Tags", self.set_tags(&id, tags).await.map(|_| ())),
            None => Ok(()),
        };

        let report = UpdateReport {
            title: FieldOutcome::of(&requested_title, &title),
            description: FieldOutcome::of(&requested_description, &description),
            tags: FieldOutcome::of(&update.tags, &tags),
            privacy: FieldOutcome::of(&update.privacy, &privacy),
            errors,
            video: self.get_video_details(&id).await?,
        };
        info!(errors = report.errors.len(), "Video update finished");
        Ok(report)
    }
}
