//! Caption track download and upload.

use super::client::VimeoClient;
use super::transport::{ApiRequest, TransportError};
use super::types::{parse_video_id, Video};
use crate::artifacts::ArtifactStore;
use crate::captions::{select_track, srt_to_webvtt, webvtt_to_srt, CaptionFormat, TextTrack, WEBVTT_MARKER};
use crate::error::{Result, VimeoError};
use reqwest::Method;
use serde_json::{json, Value};
use std::path::PathBuf;
use tracing::{debug, info, instrument};

/// Content type of uploaded caption files.
pub const TEXT_VTT: &str = "text/vtt";

impl VimeoClient {
    /// All text tracks attached to a video.
    #[instrument(skip(self))]
    pub async fn list_text_tracks(&self, video_id: &str) -> Result<Vec<TextTrack>> {
        let id = parse_video_id(video_id)?;
        let body = self
            .api(ApiRequest::get(format!("/videos/{}/texttracks", id)))
            .await?;

        match body.get("data") {
            Some(data @ Value::Array(_)) => Ok(serde_json::from_value(data.clone())?),
            _ => Ok(Vec::new()),
        }
    }

    /// Download the captions for `language`, converted to `format`.
    ///
    /// Tracks are served as WebVTT; conversion to SRT only happens when the
    /// content actually carries the WebVTT marker.
    #[instrument(skip(self))]
    pub async fn download_transcript(
        &self,
        video_id: &str,
        language: &str,
        format: CaptionFormat,
    ) -> Result<String> {
        let tracks = self.list_text_tracks(video_id).await?;
        let track = select_track(&tracks, language)?;
        debug!(track = %track.uri, tag = ?track.tag(), "Selected text track");

        let content = match track.link.as_deref() {
            Some(link) => self
                .transport
                .fetch(link)
                .await
                .map_err(direct_link_error)?,
            None if track.uri.is_empty() => {
                return Err(VimeoError::not_found(format!(
                    "Text track for language {} has no content link",
                    track.tag().unwrap_or(language)
                )))
            }
            None => match self.api(ApiRequest::get(track.uri.as_str())).await? {
                Value::String(text) => text,
                Value::Null => String::new(),
                other => other.to_string(),
            },
        };

        if format == CaptionFormat::Srt && content.contains(WEBVTT_MARKER) {
            Ok(webvtt_to_srt(&content))
        } else {
            Ok(content)
        }
    }

    /// Create a caption track and upload `content` into it.
    ///
    /// SRT input without a WebVTT marker is converted first. Returns the
    /// created track.
    #[instrument(skip(self, content), fields(bytes = content.len()))]
    pub async fn upload_transcript(
        &self,
        video_id: &str,
        content: &str,
        language: &str,
        format: CaptionFormat,
    ) -> Result<TextTrack> {
        let id = parse_video_id(video_id)?;
        let body = if format == CaptionFormat::Srt && !content.contains(WEBVTT_MARKER) {
            srt_to_webvtt(content)
        } else {
            content.to_string()
        };

        let created = self
            .api(
                ApiRequest::new(Method::POST, format!("/videos/{}/texttracks", id)).with_params(json!({
                    "type": "captions",
                    "language": language,
                    "name": format!("Captions ({})", language),
                })),
            )
            .await?;
        let track: TextTrack = if created.is_null() {
            TextTrack::default()
        } else {
            serde_json::from_value(created)?
        };

        if let Some(link) = track.link.as_deref() {
            self.rate_limit
                .run(|| self.transport.upload(link, body, TEXT_VTT))
                .await
                .map_err(|err| match err {
                    VimeoError::Api { status, message } => VimeoError::Api {
                        status,
                        message: format!("Failed to upload transcript: {}", message),
                    },
                    other => other,
                })?;
        }

        info!(video_id = %id, language, "Transcript uploaded");
        Ok(track)
    }

    /// Download a transcript and store it under the video's date folder.
    #[instrument(skip(self, store))]
    pub async fn download_transcript_to_file(
        &self,
        video_id: &str,
        language: &str,
        format: CaptionFormat,
        store: &ArtifactStore,
    ) -> Result<PathBuf> {
        let video: Video = serde_json::from_value(self.get_video_details(video_id).await?)?;
        let transcript = self.download_transcript(video_id, language, format).await?;
        let path = store.save_transcript(&video, format, &transcript)?;
        info!(path = %path.display(), "Transcript saved");
        Ok(path)
    }
}

fn direct_link_error(err: TransportError) -> VimeoError {
    match err.status_code() {
        Some(status) => VimeoError::Api {
            status,
            message: format!("Failed to download transcript from direct link: {}", err),
        },
        None => VimeoError::Transport(err),
    }
}
