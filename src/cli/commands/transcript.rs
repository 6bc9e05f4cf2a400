//! Transcript command implementation.

use crate::artifacts::ArtifactStore;
use crate::captions::CaptionFormat;
use crate::cli::Output;
use crate::config::Settings;
use crate::vimeo::VimeoClient;
use anyhow::Result;

/// Download captions, printing them or saving them as an artifact.
pub async fn run_transcript(
    video_id: &str,
    language: &str,
    format: CaptionFormat,
    save: bool,
    base_path: Option<&str>,
    settings: Settings,
) -> Result<()> {
    let client = VimeoClient::from_settings(&settings)?;

    if save {
        let store = ArtifactStore::from_settings(&settings, base_path);
        let spinner = Output::spinner("Downloading transcript...");
        let result = client
            .download_transcript_to_file(video_id, language, format, &store)
            .await;
        spinner.finish_and_clear();

        let path = result?;
        Output::success(&format!("Transcript saved to {}", path.display()));
        return Ok(());
    }

    let transcript = client.download_transcript(video_id, language, format).await?;
    print!("{}", transcript);
    if !transcript.ends_with('\n') {
        println!();
    }
    Ok(())
}
