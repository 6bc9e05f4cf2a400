//! Caption tracks: discovery, language fallback and format conversion.

mod convert;

pub use convert::{
    is_sequence_number, srt_to_webvtt, webvtt_to_srt, CUE_TIME_SEPARATOR, WEBVTT_MARKER,
};

use crate::error::{Result, VimeoError};
use crate::vimeo::null_as_default;
use serde::{Deserialize, Serialize};

/// Language tag Vimeo gives its own English speech-to-text captions.
pub const ENGLISH_AUTOGEN: &str = "en-x-autogen";

/// Caption formats the tools accept and return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptionFormat {
    /// Native format of Vimeo text tracks.
    #[default]
    #[serde(alias = "vtt")]
    WebVtt,
    Srt,
}

impl CaptionFormat {
    /// File extension for saved transcripts.
    pub fn extension(&self) -> &'static str {
        match self {
            CaptionFormat::WebVtt => "vtt",
            CaptionFormat::Srt => "srt",
        }
    }
}

impl std::str::FromStr for CaptionFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "webvtt" | "vtt" => Ok(CaptionFormat::WebVtt),
            "srt" => Ok(CaptionFormat::Srt),
            _ => Err(format!("Unknown caption format: {}. Use webvtt or srt.", s)),
        }
    }
}

impl std::fmt::Display for CaptionFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaptionFormat::WebVtt => write!(f, "webvtt"),
            CaptionFormat::Srt => write!(f, "srt"),
        }
    }
}

/// A caption/subtitle resource attached to a video.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextTrack {
    #[serde(default, deserialize_with = "null_as_default")]
    pub uri: String,
    #[serde(default)]
    pub language: Option<String>,
    /// Some responses carry the tag here instead of `language`.
    #[serde(default)]
    pub language_code: Option<String>,
    /// Direct download link for the track content.
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub active: bool,
}

impl TextTrack {
    /// The track's language tag, whichever field carries it.
    pub fn tag(&self) -> Option<&str> {
        self.language.as_deref().or(self.language_code.as_deref())
    }

    fn tag_matches(&self, pred: impl Fn(&str) -> bool) -> bool {
        self.language.as_deref().is_some_and(&pred) || self.language_code.as_deref().is_some_and(&pred)
    }
}

/// Pick the track for `language`.
///
/// Tried in order: an exact tag match; for `en`, the auto-generated English
/// track; any dialect of the language (`<language>-...`). When nothing matches
/// the error lists every tag that was available.
pub fn select_track<'a>(tracks: &'a [TextTrack], language: &str) -> Result<&'a TextTrack> {
    let dialect_prefix = format!("{}-", language);

    tracks
        .iter()
        .find(|t| t.tag_matches(|tag| tag == language))
        .or_else(|| {
            (language == "en")
                .then(|| tracks.iter().find(|t| t.tag_matches(|tag| tag == ENGLISH_AUTOGEN)))
                .flatten()
        })
        .or_else(|| {
            tracks
                .iter()
                .find(|t| t.tag_matches(|tag| tag.starts_with(&dialect_prefix)))
        })
        .ok_or_else(|| {
            VimeoError::not_found(format!(
                "No transcript available for language: {}. Available languages: {}",
                language,
                available_languages(tracks)
            ))
        })
}

/// Comma-separated language tags, or `none`.
pub fn available_languages(tracks: &[TextTrack]) -> String {
    let tags: Vec<&str> = tracks.iter().filter_map(TextTrack::tag).collect();
    if tags.is_empty() {
        "none".to_string()
    } else {
        tags.join(", ")
    }
}

/// Plain spoken text of a caption document, without headers, timings or numbering.
pub fn extract_text(captions: &str) -> String {
    captions
        .lines()
        .map(str::trim)
        .filter(|line| {
            !line.is_empty()
                && !line.contains(WEBVTT_MARKER)
                && !line.contains(CUE_TIME_SEPARATOR)
                && !is_sequence_number(line)
        })
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(language: &str) -> TextTrack {
        TextTrack {
            uri: format!("/videos/1/texttracks/{}", language),
            language: Some(language.to_string()),
            ..TextTrack::default()
        }
    }

    #[test]
    fn test_exact_match_wins() {
        let tracks = vec![track("en-x-autogen"), track("en")];
        assert_eq!(select_track(&tracks, "en").unwrap().tag(), Some("en"));
    }

    #[test]
    fn test_english_autogen_fallback() {
        let tracks = vec![track("en-x-autogen")];
        assert_eq!(select_track(&tracks, "en").unwrap().tag(), Some("en-x-autogen"));
    }

    #[test]
    fn test_dialect_prefix_match() {
        let tracks = vec![track("es"), track("pt-BR")];
        assert_eq!(select_track(&tracks, "pt").unwrap().tag(), Some("pt-BR"));
        // "e" must not match "es" or "en-..." without the dash boundary.
        assert!(select_track(&tracks, "e").is_err());
    }

    #[test]
    fn test_null_fields_decode() {
        let tracks: Vec<TextTrack> = serde_json::from_value(serde_json::json!([
            { "uri": null, "language": "en", "active": null, "link": "https://captions.example/en.vtt" },
            { "uri": "/videos/1/texttracks/2", "language": "es" }
        ]))
        .unwrap();

        assert_eq!(tracks[0].uri, "");
        assert!(!tracks[0].active);
        assert_eq!(select_track(&tracks, "en").unwrap().link.as_deref(), Some("https://captions.example/en.vtt"));
        assert_eq!(select_track(&tracks, "es").unwrap().uri, "/videos/1/texttracks/2");
    }

    #[test]
    fn test_language_code_field() {
        let tracks = vec![TextTrack {
            language_code: Some("de".to_string()),
            ..TextTrack::default()
        }];
        assert!(select_track(&tracks, "de").is_ok());
    }

    #[test]
    fn test_missing_language_lists_available() {
        let tracks = vec![track("en"), track("es")];
        let err = select_track(&tracks, "fr").unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(
            err.to_string(),
            "No transcript available for language: fr. Available languages: en, es"
        );

        let err = select_track(&[], "fr").unwrap_err();
        assert!(err.to_string().ends_with("Available languages: none"));
    }

    #[test]
    fn test_parse_format() {
        assert_eq!("webvtt".parse::<CaptionFormat>().unwrap(), CaptionFormat::WebVtt);
        assert_eq!("VTT".parse::<CaptionFormat>().unwrap(), CaptionFormat::WebVtt);
        assert_eq!("srt".parse::<CaptionFormat>().unwrap(), CaptionFormat::Srt);
        assert!("ass".parse::<CaptionFormat>().is_err());
        assert_eq!(CaptionFormat::Srt.extension(), "srt");
        assert_eq!(
            serde_json::from_str::<CaptionFormat>("\"webvtt\"").unwrap(),
            CaptionFormat::WebVtt
        );
    }

    #[test]
    fn test_extract_text() {
        let vtt = "WEBVTT\n\n1\n00:00:00.000 --> 00:00:01.000\nHello   there\n\n2\n00:00:01.000 --> 00:00:02.000\nfriend\n";
        assert_eq!(extract_text(vtt), "Hello there friend");
    }
}
