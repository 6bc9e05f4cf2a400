//! Markdown suggestion report.

use super::{ContentAnalysis, ContentType, SessionType};
use crate::vimeo::Video;
use chrono::{DateTime, Datelike, Utc};
use std::fmt::Write;

const MAX_TITLES: usize = 6;

/// Tag suggestions grouped by reach.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestedTags {
    pub primary: Vec<String>,
    pub secondary: Vec<String>,
    pub niche: Vec<String>,
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn format_label(analysis: &ContentAnalysis) -> &'static str {
    if analysis.coding_score >= 5 && analysis.motivation_score >= 3 {
        "Both"
    } else if analysis.coding_score >= analysis.motivation_score {
        "Coding"
    } else {
        "Motivation"
    }
}

/// Up to six titles of the form `Day <n> - <format> - <hook>`, most specific first.
pub fn title_suggestions(day: u32, analysis: &ContentAnalysis) -> Vec<String> {
    let topic_has = |needle: &str| analysis.key_topics.iter().any(|t| t.contains(needle));

    let mut hooks: Vec<&str> = Vec::new();
    if topic_has("market") && topic_has("project") {
        hooks.extend(["Marketing Sprint Session", "Building the Marketing Engine"]);
    }
    if topic_has("hour") || topic_has("time") {
        hooks.extend(["Racing Against Time", "One Hour Power Session"]);
    }
    if analysis.session_type == SessionType::Sprint {
        hooks.extend(["Focused Sprint Session", "High-Intensity Work Block"]);
    }
    hooks.extend([
        "Daily Progress Update",
        "Building the Dream",
        "Hustle & Flow Session",
        "Real Work, Real Progress",
        "The Grind Continues",
        "Making It Happen",
    ]);

    let label = format_label(analysis);
    hooks
        .into_iter()
        .take(MAX_TITLES)
        .map(|hook| format!("Day {} - {} - {}", day, label, hook))
        .collect()
}

fn to_strings(tags: &[&str]) -> Vec<String> {
    tags.iter().map(|t| t.to_string()).collect()
}

pub fn suggested_tags(analysis: &ContentAnalysis) -> SuggestedTags {
    let mut primary = to_strings(&["Entrepreneur", "Progress", "RealTalk"]);
    primary.insert(1, analysis.content_type.to_string());

    let mut niche: Vec<String> = analysis.key_topics.iter().take(3).map(|t| capitalize(t)).collect();
    niche.push(analysis.session_type.to_string().replace(' ', ""));
    niche.push(format!("{}Session", analysis.content_type));

    SuggestedTags {
        primary,
        secondary: to_strings(&[
            "Productivity",
            "Startup",
            "TechEntrepreneur",
            "WorkSession",
            "DailyProgress",
        ]),
        niche,
    }
}

fn description_suggestion(day: u32, analysis: &ContentAnalysis, video: &Video) -> String {
    let mut topics = Vec::new();
    if analysis.key_topics.iter().any(|t| t == "marketing") {
        topics.push("Marketing strategy development");
        topics.push("Strategic planning and execution");
    }
    topics.extend([
        "Progress updates and insights",
        "Real-time problem solving",
    ]);

    let focus = analysis
        .key_topics
        .iter()
        .take(2)
        .cloned()
        .collect::<Vec<_>>()
        .join(" & ");
    let hashtags = analysis
        .key_topics
        .iter()
        .take(3)
        .map(|t| format!("#{}", capitalize(t)))
        .collect::<Vec<_>>()
        .join(" ");
    let content = analysis.content_type.to_string().to_lowercase();
    let question = if analysis.content_type == ContentType::Coding {
        "developing"
    } else {
        "staying motivated"
    };

    let mut out = String::new();
    let _ = writeln!(out, "**Day {}**\n", day);
    let _ = writeln!(out, "In this {} session:", content);
    for topic in topics {
        let _ = writeln!(out, "- {}", topic);
    }
    let _ = writeln!(out, "\n**Session stats:**");
    let _ = writeln!(out, "- Day: {}", day);
    let _ = writeln!(out, "- Length: {} minutes", video.duration / 60);
    let _ = writeln!(out, "- Focus: {}", if focus.is_empty() { "general" } else { focus.as_str() });
    let _ = writeln!(out, "- Energy: {}", analysis.sentiment);
    let _ = writeln!(out, "\n#{} {}", analysis.content_type, hashtags);
    let _ = write!(
        out,
        "\n**What's your biggest challenge when {}?** Let me know in the comments.",
        question
    );
    out
}

fn bullet_list(items: &[String]) -> String {
    items
        .iter()
        .map(|i| format!("- {}", i))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render the full suggestion report for one video.
pub fn render_report(
    video: &Video,
    analysis: &ContentAnalysis,
    transcript_len: usize,
    generated_at: DateTime<Utc>,
) -> String {
    let created = video.created_time.unwrap_or(generated_at);
    let day = created.day();
    let titles = title_suggestions(day, analysis);
    let tags = suggested_tags(analysis);

    let top_keywords = analysis
        .keywords
        .iter()
        .take(5)
        .map(|(word, count)| format!("{} ({}x)", word, count))
        .collect::<Vec<_>>()
        .join(", ");

    let primary_titles = titles
        .iter()
        .take(3)
        .enumerate()
        .map(|(i, t)| format!("{}. **{}**", i + 1, t))
        .collect::<Vec<_>>()
        .join("\n");
    let alternative_titles = titles
        .iter()
        .enumerate()
        .skip(3)
        .map(|(i, t)| format!("{}. {}", i + 1, t))
        .collect::<Vec<_>>()
        .join("\n");

    let mut md = String::new();
    let _ = writeln!(md, "# Video Content Analysis & Suggestions\n");

    let _ = writeln!(md, "## Video Details");
    let _ = writeln!(md, "- **Video ID**: {}", video.id());
    let _ = writeln!(md, "- **Original Title**: {}", video.name);
    let _ = writeln!(md, "- **Duration**: {}:{:02}", video.duration / 60, video.duration % 60);
    let _ = writeln!(md, "- **Upload Date**: {}", created.format("%Y-%m-%d"));
    let _ = writeln!(md, "- **View Count**: {}", video.plays());
    let _ = writeln!(md, "- **Privacy**: {}\n", video.privacy_view());

    let _ = writeln!(md, "## Content Analysis");
    let _ = writeln!(
        md,
        "- **Content Type**: {} (Coding: {}, Motivation: {})",
        analysis.content_type, analysis.coding_score, analysis.motivation_score
    );
    let _ = writeln!(md, "- **Key Topics**: {}", analysis.key_topics.join(", "));
    let _ = writeln!(md, "- **Top Keywords**: {}", top_keywords);
    let _ = writeln!(md, "- **Sentiment**: {}", analysis.sentiment);
    let _ = writeln!(md, "- **Technical Level**: {}", analysis.technical_level);
    let _ = writeln!(md, "- **Session Type**: {}\n", analysis.session_type);

    let _ = writeln!(md, "## Title Suggestions\n");
    let _ = writeln!(md, "### Primary Recommendations\n{}\n", primary_titles);
    let _ = writeln!(md, "### Alternative Options\n{}\n", alternative_titles);

    let _ = writeln!(md, "## Description Suggestion\n");
    let _ = writeln!(md, "{}\n", description_suggestion(day, analysis, video));

    let _ = writeln!(md, "## Tag Suggestions\n");
    let _ = writeln!(md, "### Primary Tags\n{}\n", bullet_list(&tags.primary));
    let _ = writeln!(md, "### Secondary Tags\n{}\n", bullet_list(&tags.secondary));
    let _ = writeln!(md, "### Niche Tags\n{}\n", bullet_list(&tags.niche));

    let _ = writeln!(md, "---");
    let _ = writeln!(md, "*Generated: {}*", generated_at.format("%Y-%m-%d %H:%M:%S UTC"));
    let _ = writeln!(md, "*Transcript length: {} characters*", transcript_len);
    let _ = writeln!(md, "*Analysis confidence: {}%*", analysis.confidence());

    md
}
