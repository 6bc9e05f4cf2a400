//! Date-organised output folders for transcripts and analysis reports.
//!
//! ```text
//! <base>/<YYYY-MM-DD>/transcripts/<date>_<slug>_<id>.vtt
//! <base>/<YYYY-MM-DD>/suggestions/<date>_<slug>_suggestions.md
//! ```
//!
//! The date is the video's creation date (UTC), falling back to today when the
//! API did not return one.

use crate::captions::CaptionFormat;
use crate::config::Settings;
use crate::error::Result;
use crate::vimeo::Video;
use chrono::{NaiveDate, Utc};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

const TRANSCRIPTS_DIR: &str = "transcripts";
const SUGGESTIONS_DIR: &str = "suggestions";
const MAX_SLUG_LEN: usize = 50;

static NON_SLUG_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9\s-]").expect("Invalid regex"));
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("Invalid regex"));
static DASHES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-+").expect("Invalid regex"));

/// Turn a video title into a filename-safe slug.
pub fn slugify(title: &str) -> String {
    let lower = title.to_lowercase();
    let cleaned = NON_SLUG_CHARS.replace_all(&lower, "");
    let dashed = WHITESPACE.replace_all(&cleaned, "-");
    let collapsed = DASHES.replace_all(&dashed, "-");
    let truncated: String = collapsed.chars().take(MAX_SLUG_LEN).collect();
    truncated.trim_matches('-').to_string()
}

/// Writes files below one base directory.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    base: PathBuf,
}

impl ArtifactStore {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Store rooted at `base_path` if given, else at the configured output path.
    pub fn from_settings(settings: &Settings, base_path: Option<&str>) -> Self {
        match base_path {
            Some(path) => Self::new(Settings::expand_path(path)),
            None => Self::new(settings.base_path()),
        }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    fn date_dir(&self, video: &Video) -> (PathBuf, String) {
        let date = video
            .created_date()
            .unwrap_or_else(|| Utc::now().date_naive());
        let date = format_date(date);
        (self.base.join(&date), date)
    }

    /// Where the transcript for `video` is saved.
    pub fn transcript_path(&self, video: &Video, format: CaptionFormat) -> PathBuf {
        let (dir, date) = self.date_dir(video);
        dir.join(TRANSCRIPTS_DIR).join(format!(
            "{}_{}_{}.{}",
            date,
            slugify(&video.name),
            video.id(),
            format.extension()
        ))
    }

    /// Where the analysis report for `video` is saved.
    pub fn report_path(&self, video: &Video) -> PathBuf {
        let (dir, date) = self.date_dir(video);
        dir.join(SUGGESTIONS_DIR)
            .join(format!("{}_{}_suggestions.md", date, slugify(&video.name)))
    }

    /// Save a transcript, creating the date folder with both subfolders.
    pub fn save_transcript(&self, video: &Video, format: CaptionFormat, content: &str) -> Result<PathBuf> {
        let (dir, _) = self.date_dir(video);
        fs::create_dir_all(dir.join(TRANSCRIPTS_DIR))?;
        fs::create_dir_all(dir.join(SUGGESTIONS_DIR))?;

        let path = self.transcript_path(video, format);
        fs::write(&path, content)?;
        Ok(path)
    }

    /// Save an analysis report.
    pub fn save_report(&self, video: &Video, markdown: &str) -> Result<PathBuf> {
        let (dir, _) = self.date_dir(video);
        fs::create_dir_all(dir.join(SUGGESTIONS_DIR))?;

        let path = self.report_path(video);
        fs::write(&path, markdown)?;
        Ok(path)
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
