//! MCP tool definitions and their typed arguments.

use super::protocol::Tool;
use crate::captions::CaptionFormat;
use crate::vimeo::VideoUpdate;
use serde::Deserialize;
use serde_json::{json, Value};

pub const HEALTH_CHECK: &str = "vimeo_health_check";
pub const VALIDATE_VIDEO: &str = "vimeo_validate_video";
pub const LIST_VIDEOS_MINIMAL: &str = "vimeo_list_videos_minimal";
pub const LIST_VIDEOS: &str = "vimeo_list_videos";
pub const GET_VIDEO_DETAILS: &str = "vimeo_get_video_details";
pub const UPDATE_VIDEO: &str = "vimeo_update_video";
pub const DOWNLOAD_TRANSCRIPT: &str = "vimeo_download_transcript";
pub const UPLOAD_TRANSCRIPT: &str = "vimeo_upload_transcript";
pub const GET_VIDEO_STATS: &str = "vimeo_get_video_stats";
pub const DOWNLOAD_TRANSCRIPT_TO_FILE: &str = "vimeo_download_transcript_to_file";
pub const GENERATE_CONTENT_ANALYSIS: &str = "vimeo_generate_content_analysis";

fn default_language() -> String {
    "en".to_string()
}

#[derive(Debug, Deserialize)]
pub struct VideoArgs {
    pub video_id: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateVideoArgs {
    pub video_id: String,
    #[serde(flatten)]
    pub update: VideoUpdate,
}

#[derive(Debug, Deserialize)]
pub struct TranscriptArgs {
    pub video_id: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub format: CaptionFormat,
    /// Only read by the save-to-file tool.
    #[serde(default)]
    pub base_path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UploadTranscriptArgs {
    pub video_id: String,
    pub content: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub format: CaptionFormat,
}

#[derive(Debug, Deserialize)]
pub struct AnalysisArgs {
    pub video_id: String,
    #[serde(default)]
    pub base_path: Option<String>,
}

fn video_id_schema(description: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            "video_id": {
                "type": "string",
                "description": description
            }
        },
        "required": ["video_id"]
    })
}

fn listing_properties(max_per_page: u32, default_per_page: u32) -> serde_json::Map<String, Value> {
    let schema = json!({
        "page": { "type": "number", "minimum": 1, "default": 1 },
        "per_page": {
            "type": "number",
            "minimum": 1,
            "maximum": max_per_page,
            "default": default_per_page,
            "description": format!("Number of videos to return (larger values are reduced to {})", max_per_page)
        },
        "query": { "type": "string", "description": "Search query" },
        "sort": {
            "type": "string",
            "enum": ["date", "alphabetical", "plays", "likes", "duration"],
            "description": "Sort order for the results"
        },
        "direction": {
            "type": "string",
            "enum": ["asc", "desc"],
            "description": "Sort direction"
        }
    });
    match schema {
        Value::Object(map) => map,
        _ => serde_json::Map::new(),
    }
}

fn language_property() -> Value {
    json!({
        "type": "string",
        "default": "en",
        "description": "Language code (e.g., 'en', 'es', 'fr')"
    })
}

fn format_property() -> Value {
    json!({
        "type": "string",
        "enum": ["webvtt", "srt"],
        "default": "webvtt",
        "description": "Transcript format"
    })
}

fn base_path_property() -> Value {
    json!({
        "type": "string",
        "description": "Base directory for saved files (defaults to the configured output path)"
    })
}

fn tool(name: &str, description: &str, input_schema: Value) -> Tool {
    Tool {
        name: name.to_string(),
        description: description.to_string(),
        input_schema,
    }
}

/// Get all available tools.
pub fn get_tools() -> Vec<Tool> {
    let mut full_listing = listing_properties(15, 10);
    full_listing.insert(
        "compact".to_string(),
        json!({
            "type": "boolean",
            "default": true,
            "description": "Compact response mode (uri, name, description, duration, times, privacy, plays, tags). \
                Set false for sanitised full objects, limited to 8 per page."
        }),
    );
    full_listing.insert(
        "fields".to_string(),
        json!({
            "type": "array",
            "items": { "type": "string" },
            "description": "Custom fields to include, overriding compact mode. Dot notation for nested fields, e.g. 'privacy.view'"
        }),
    );

    vec![
        tool(
            HEALTH_CHECK,
            "Check the health and connectivity of the Vimeo MCP server",
            json!({ "type": "object", "properties": {} }),
        ),
        tool(
            VALIDATE_VIDEO,
            "Validate a video (required for some screen recordings before updates)",
            video_id_schema("The ID of the video to validate"),
        ),
        tool(
            LIST_VIDEOS_MINIMAL,
            "List videos with minimal data (ID, name, duration, creation time, privacy) to stay \
                within token limits. Use this for finding videos quickly.",
            json!({ "type": "object", "properties": listing_properties(20, 10) }),
        ),
        tool(
            LIST_VIDEOS,
            "List videos from the authenticated account with optional filtering. Uses compact \
                mode by default to keep responses small.",
            json!({ "type": "object", "properties": full_listing }),
        ),
        tool(
            GET_VIDEO_DETAILS,
            "Get detailed information about a specific video including metadata and basic statistics",
            video_id_schema("The ID of the video (e.g., '123456789') or its vimeo.com URL"),
        ),
        tool(
            UPDATE_VIDEO,
            "Update video metadata including title, description, tags, and privacy settings",
            json!({
                "type": "object",
                "properties": {
                    "video_id": { "type": "string", "description": "The ID of the video to update" },
                    "title": { "type": "string" },
                    "description": { "type": "string" },
                    "tags": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Replaces all existing tags"
                    },
                    "privacy": {
                        "type": "string",
                        "enum": ["anybody", "nobody", "password", "disable"],
                        "description": "Privacy setting for the video"
                    }
                },
                "required": ["video_id"]
            }),
        ),
        tool(
            DOWNLOAD_TRANSCRIPT,
            "Download video transcript or captions if available",
            json!({
                "type": "object",
                "properties": {
                    "video_id": { "type": "string", "description": "The ID of the video" },
                    "language": language_property(),
                    "format": format_property()
                },
                "required": ["video_id"]
            }),
        ),
        tool(
            UPLOAD_TRANSCRIPT,
            "Upload a new transcript or captions for a video",
            json!({
                "type": "object",
                "properties": {
                    "video_id": { "type": "string", "description": "The ID of the video" },
                    "content": {
                        "type": "string",
                        "description": "The transcript content in the specified format"
                    },
                    "language": language_property(),
                    "format": format_property()
                },
                "required": ["video_id", "content"]
            }),
        ),
        tool(
            GET_VIDEO_STATS,
            "Get basic statistics for a video including play count",
            video_id_schema("The ID of the video"),
        ),
        tool(
            DOWNLOAD_TRANSCRIPT_TO_FILE,
            "Download video transcript and save it into date-based folders",
            json!({
                "type": "object",
                "properties": {
                    "video_id": { "type": "string", "description": "The ID of the video" },
                    "language": language_property(),
                    "format": format_property(),
                    "base_path": base_path_property()
                },
                "required": ["video_id"]
            }),
        ),
        tool(
            GENERATE_CONTENT_ANALYSIS,
            "Analyse a video's captions and save title, description and tag suggestions as a markdown file",
            json!({
                "type": "object",
                "properties": {
                    "video_id": { "type": "string", "description": "The ID of the video" },
                    "base_path": base_path_property()
                },
                "required": ["video_id"]
            }),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_names_are_unique() {
        let tools = get_tools();
        let mut names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names.len(), 11);
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 11);
    }

    #[test]
    fn test_listing_limits_in_schema() {
        let tools = get_tools();
        let find = |name: &str| tools.iter().find(|t| t.name == name).unwrap();

        let minimal = &find(LIST_VIDEOS_MINIMAL).input_schema;
        assert_eq!(minimal["properties"]["per_page"]["maximum"], 20);
        assert!(minimal["properties"].get("compact").is_none());

        let full = &find(LIST_VIDEOS).input_schema;
        assert_eq!(full["properties"]["per_page"]["maximum"], 15);
        assert_eq!(full["properties"]["compact"]["default"], true);
    }

    #[test]
    fn test_args_defaults() {
        let args: TranscriptArgs = serde_json::from_value(json!({ "video_id": "1" })).unwrap();
        assert_eq!(args.language, "en");
        assert_eq!(args.format, CaptionFormat::WebVtt);

        let args: UpdateVideoArgs =
            serde_json::from_value(json!({ "video_id": "1", "title": "t", "tags": ["a"] })).unwrap();
        assert_eq!(args.update.title.as_deref(), Some("t"));
        assert_eq!(args.update.tags, Some(vec!["a".to_string()]));
        assert!(args.update.privacy.is_none());
    }
}
