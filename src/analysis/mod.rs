//! Keyword-based content analysis of caption text.
//!
//! Deliberately simple: two fixed vocabularies are counted and a handful of
//! thresholds turn the counts into labels used by the suggestion report.

mod report;

pub use report::{render_report, suggested_tags, title_suggestions, SuggestedTags};

use crate::artifacts::ArtifactStore;
use crate::captions::{extract_text, CaptionFormat};
use crate::error::Result;
use crate::vimeo::{Video, VimeoClient};
use chrono::Utc;
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{info, instrument};

const CODING_KEYWORDS: &[&str] = &[
    "code", "coding", "programming", "function", "variable", "javascript", "react", "api",
    "database", "bug", "debugging", "development", "software", "algorithm", "framework",
];

const MOTIVATION_KEYWORDS: &[&str] = &[
    "motivation", "journey", "goal", "success", "challenge", "progress", "mindset", "growth",
    "inspiration", "hustle", "determination", "achievement",
];

const MAX_TOPICS: usize = 5;
const MAX_KEYWORDS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ContentType {
    Coding,
    Motivation,
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Sentiment {
    Focused,
    Energetic,
    Balanced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TechnicalLevel {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionType {
    Sprint,
    Regular,
}

macro_rules! display_as {
    ($ty:ty { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(match self {
                    $(Self::$variant => $text),+
                })
            }
        }
    };
}

display_as!(ContentType { Coding => "Coding", Motivation => "Motivation", Both => "Both" });
display_as!(Sentiment { Focused => "Focused", Energetic => "Energetic", Balanced => "Balanced" });
display_as!(TechnicalLevel {
    Beginner => "Beginner",
    Intermediate => "Intermediate",
    Advanced => "Advanced",
});
display_as!(SessionType { Sprint => "Sprint Session", Regular => "Regular Session" });

/// Result of analysing one transcript.
#[derive(Debug, Clone, Serialize)]
pub struct ContentAnalysis {
    pub content_type: ContentType,
    pub coding_score: usize,
    pub motivation_score: usize,
    /// Frequent longer words, most frequent first.
    pub key_topics: Vec<String>,
    /// Most frequent words with their counts.
    pub keywords: Vec<(String, usize)>,
    pub sentiment: Sentiment,
    pub session_type: SessionType,
    pub technical_level: TechnicalLevel,
}

impl ContentAnalysis {
    /// Rough confidence percentage shown in the report.
    pub fn confidence(&self) -> usize {
        (70 + self.coding_score + self.motivation_score).min(95)
    }
}

/// Analyse a caption document (WebVTT or SRT).
pub fn analyze_transcript(captions: &str) -> ContentAnalysis {
    let text = extract_text(captions).to_lowercase();

    let mut coding_score = 0;
    let mut motivation_score = 0;
    // Counts in order of first appearance so ties rank stably.
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();

    for word in text
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|w| !w.is_empty())
    {
        if CODING_KEYWORDS.contains(&word) {
            coding_score += 1;
        }
        if MOTIVATION_KEYWORDS.contains(&word) {
            motivation_score += 1;
        }
        let count = counts.entry(word.to_string()).or_insert_with(|| {
            order.push(word.to_string());
            0
        });
        *count += 1;
    }

    let mut ranked: Vec<(String, usize)> = order
        .into_iter()
        .map(|w| {
            let n = counts[&w];
            (w, n)
        })
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    let key_topics = ranked
        .iter()
        .filter(|(word, count)| *count > 2 && word.chars().count() > 3)
        .take(MAX_TOPICS)
        .map(|(word, _)| word.clone())
        .collect();

    let content_type = if coding_score > motivation_score && coding_score > 3 {
        ContentType::Coding
    } else if motivation_score > coding_score && motivation_score > 2 {
        ContentType::Motivation
    } else {
        ContentType::Both
    };

    let session_type = if text.contains("hour") || text.contains("time") {
        SessionType::Sprint
    } else {
        SessionType::Regular
    };

    let sentiment = if coding_score > 5 {
        Sentiment::Focused
    } else if motivation_score > 3 {
        Sentiment::Energetic
    } else {
        Sentiment::Balanced
    };

    let technical_level = match coding_score {
        n if n > 8 => TechnicalLevel::Advanced,
        n if n > 4 => TechnicalLevel::Intermediate,
        _ => TechnicalLevel::Beginner,
    };

    ranked.truncate(MAX_KEYWORDS);

    ContentAnalysis {
        content_type,
        coding_score,
        motivation_score,
        key_topics,
        keywords: ranked,
        sentiment,
        session_type,
        technical_level,
    }
}

impl VimeoClient {
    /// Analyse a video's English captions and save a suggestion report.
    #[instrument(skip(self, store))]
    pub async fn generate_content_analysis_file(
        &self,
        video_id: &str,
        store: &ArtifactStore,
    ) -> Result<PathBuf> {
        let video: Video = serde_json::from_value(self.get_video_details(video_id).await?)?;
        let transcript = self
            .download_transcript(video_id, "en", CaptionFormat::WebVtt)
            .await?;

        let analysis = analyze_transcript(&transcript);
        let markdown = render_report(&video, &analysis, transcript.len(), Utc::now());
        let path = store.save_report(&video, &markdown)?;

        info!(path = %path.display(), content_type = %analysis.content_type, "Analysis report saved");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vimeo::testing::{client, ScriptedTransport};
    use serde_json::json;

    fn captions(lines: &[&str]) -> String {
        let mut out = String::from("WEBVTT\n\n");
        for (i, line) in lines.iter().enumerate() {
            out.push_str(&format!(
                "{}\n00:00:{:02}.000 --> 00:00:{:02}.500\n{}\n\n",
                i + 1,
                i,
                i,
                line
            ));
        }
        out
    }

    #[test]
    fn test_coding_session() {
        let text = captions(&[
            "Let's write some code for the api.",
            "This function has a bug, debugging the function now.",
            "The database function is done. Coding is fun, code code code.",
        ]);
        let analysis = analyze_transcript(&text);

        assert_eq!(analysis.coding_score, 12);
        assert_eq!(analysis.motivation_score, 0);
        assert_eq!(analysis.content_type, ContentType::Coding);
        assert_eq!(analysis.technical_level, TechnicalLevel::Advanced);
        assert_eq!(analysis.sentiment, Sentiment::Focused);
        assert_eq!(analysis.session_type, SessionType::Regular);
        assert_eq!(analysis.key_topics, vec!["code", "function"]);
        assert_eq!(analysis.keywords[0], ("code".to_string(), 4));
    }

    #[test]
    fn test_motivation_session() {
        let text = captions(&[
            "Day one of the journey. The goal is growth.",
            "Progress takes time and the right mindset.",
        ]);
        let analysis = analyze_transcript(&text);

        assert_eq!(analysis.motivation_score, 5);
        assert_eq!(analysis.content_type, ContentType::Motivation);
        assert_eq!(analysis.sentiment, Sentiment::Energetic);
        assert_eq!(analysis.session_type, SessionType::Sprint);
        assert!(analysis.key_topics.is_empty());
    }

    #[test]
    fn test_numbers_and_timings_are_ignored() {
        let analysis = analyze_transcript(&captions(&["hello"]));
        assert_eq!(analysis.keywords, vec![("hello".to_string(), 1)]);
        assert_eq!(analysis.content_type, ContentType::Both);
        assert_eq!(analysis.confidence(), 70);
    }

    #[tokio::test]
    async fn test_generate_report_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        let transport = ScriptedTransport::new(vec![
            Ok(json!({
                "uri": "/videos/7",
                "name": "Day 12",
                "duration": 125,
                "created_time": "2025-03-12T10:00:00+00:00",
                "stats": { "plays": 3 },
                "privacy": { "view": "anybody" }
            })),
            Ok(json!({ "data": [{ "uri": "/videos/7/texttracks/1", "language": "en" }] })),
            Ok(serde_json::Value::String(captions(&["code code code"]))),
        ]);

        let path = client(&transport)
            .generate_content_analysis_file("7", &store)
            .await
            .unwrap();

        assert!(path.ends_with("2025-03-12/suggestions/2025-03-12_day-12_suggestions.md"));
        let markdown = std::fs::read_to_string(path).unwrap();
        assert!(markdown.starts_with("# Video Content Analysis & Suggestions"));
        assert!(markdown.contains("- **Video ID**: 7"));
        assert!(markdown.contains("- **Duration**: 2:05"));
    }
}
