//! Typed views of Vimeo resources and request parameters.

use crate::error::{Result, VimeoError};
use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::LazyLock;

static VIDEO_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
        ^
        (?:
            (?:https?://)?(?:www\.|player\.)?vimeo\.com/(?:video/)?   # page or player URL
            |
            /videos/                                                  # API URI
        )?
        (\d+)
        (?:[/?\#].*)?
        $
    ",
    )
    .expect("Invalid regex")
});

/// Deserialize a field that the API may send as `null`, falling back to its default.
pub fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Extract a numeric video ID from a bare ID, an API URI or a vimeo.com URL.
pub fn parse_video_id(input: &str) -> Result<String> {
    VIDEO_ID
        .captures(input.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| VimeoError::InvalidInput(format!("Invalid Vimeo video ID or URL: {}", input)))
}

/// Who can view a video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Privacy {
    Anybody,
    Nobody,
    Password,
    Disable,
}

impl std::fmt::Display for Privacy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Privacy::Anybody => "anybody",
            Privacy::Nobody => "nobody",
            Privacy::Password => "password",
            Privacy::Disable => "disable",
        };
        f.write_str(s)
    }
}

/// Sort keys accepted by the video listing endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Date,
    Alphabetical,
    Plays,
    Likes,
    Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Parameters of a video listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListVideosParams {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub query: Option<String>,
    pub sort: Option<SortOrder>,
    pub direction: Option<SortDirection>,
    /// Compact response mode; on unless explicitly disabled.
    pub compact: Option<bool>,
    /// Custom field paths, overriding the response mode.
    pub fields: Option<Vec<String>>,
}

/// Metadata changes requested for a video.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub privacy: Option<Privacy>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoPrivacy {
    #[serde(default)]
    pub view: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoStats {
    #[serde(default)]
    pub plays: Option<u64>,
}

/// The subset of a video resource the file and report helpers need.
#[derive(Debug, Clone, Deserialize)]
pub struct Video {
    #[serde(default, deserialize_with = "null_as_default")]
    pub uri: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub duration: u64,
    #[serde(default)]
    pub created_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub privacy: Option<VideoPrivacy>,
    #[serde(default)]
    pub stats: Option<VideoStats>,
}

impl Video {
    /// Numeric ID, taken from the end of the URI.
    pub fn id(&self) -> &str {
        self.uri.rsplit('/').next().unwrap_or_default()
    }

    /// Calendar date (UTC) the video was created.
    pub fn created_date(&self) -> Option<NaiveDate> {
        self.created_time.map(|t| t.date_naive())
    }

    pub fn plays(&self) -> u64 {
        self.stats.as_ref().and_then(|s| s.plays).unwrap_or(0)
    }

    pub fn privacy_view(&self) -> &str {
        self.privacy
            .as_ref()
            .and_then(|p| p.view.as_deref())
            .unwrap_or("Unknown")
    }
}
