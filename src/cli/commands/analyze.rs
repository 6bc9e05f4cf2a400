//! Analyze command implementation.

use crate::artifacts::ArtifactStore;
use crate::cli::Output;
use crate::config::Settings;
use crate::vimeo::VimeoClient;
use anyhow::Result;

/// Analyse a video's captions and write the suggestion report.
pub async fn run_analyze(video_id: &str, base_path: Option<&str>, settings: Settings) -> Result<()> {
    let client = VimeoClient::from_settings(&settings)?;
    let store = ArtifactStore::from_settings(&settings, base_path);

    let spinner = Output::spinner("Analysing captions...");
    let result = client.generate_content_analysis_file(video_id, &store).await;
    spinner.finish_and_clear();

    match result {
        Ok(path) => {
            Output::success(&format!("Content analysis saved to {}", path.display()));
            Ok(())
        }
        Err(e) => {
            Output::error(&format!("Analysis failed: {}", e));
            Err(e.into())
        }
    }
}
