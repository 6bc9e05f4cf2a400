//! List command implementation.

use crate::cli::{ListMode, Output};
use crate::config::Settings;
use crate::vimeo::{ListVideosParams, Video, VimeoClient};
use anyhow::Result;
use serde_json::Value;

/// Run the list command.
pub async fn run_list(params: ListVideosParams, mode: ListMode, json: bool, settings: Settings) -> Result<()> {
    let client = VimeoClient::from_settings(&settings)?;

    let spinner = Output::spinner("Fetching videos...");
    let result = fetch(&client, params, mode).await;
    spinner.finish_and_clear();

    let page = match result {
        Ok(page) => page,
        Err(e) => {
            Output::error(&format!("Failed to list videos: {}", e));
            return Err(e.into());
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&page)?);
        return Ok(());
    }

    print_page(&page);
    Ok(())
}

async fn fetch(client: &VimeoClient, mut params: ListVideosParams, mode: ListMode) -> crate::Result<Value> {
    match mode {
        ListMode::Minimal => client.list_videos_minimal(&params).await,
        ListMode::Compact | ListMode::Full => {
            params.compact = Some(mode == ListMode::Compact);
            client.list_videos(&params).await
        }
    }
}

fn print_page(page: &Value) {
    let videos: Vec<Video> = page
        .get("data")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| serde_json::from_value(item.clone()).ok())
                .collect()
        })
        .unwrap_or_default();

    if videos.is_empty() {
        Output::info("No videos found.");
        return;
    }

    let total = page.get("total").and_then(Value::as_u64);
    Output::header(&match total {
        Some(total) => format!("Videos ({} of {})", videos.len(), total),
        None => format!("Videos ({})", videos.len()),
    });
    println!();

    for video in &videos {
        let created = video
            .created_date()
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());
        Output::video_row(&video.name, video.id(), video.duration, video.privacy_view(), &created);
    }

    if let Some(meta) = page.get("_meta") {
        println!();
        if let Some(tokens) = meta.get("estimated_tokens").and_then(Value::as_u64) {
            Output::kv("Estimated tokens", &tokens.to_string());
        }
        if let Some(warning) = meta.get("page_size_warning").and_then(Value::as_str) {
            Output::warning(warning);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vimeo::testing::{client, ScriptedTransport};
    use serde_json::json;

    #[tokio::test]
    async fn test_full_mode_disables_compact() {
        let transport = ScriptedTransport::new(vec![Ok(json!({
            "data": [{ "uri": "/videos/1", "name": "A", "embed": { "html": "<iframe>" } }]
        }))]);
        let client = client(&transport);

        let page = fetch(&client, ListVideosParams::default(), ListMode::Full)
            .await
            .unwrap();
        assert_eq!(page["_meta"]["response_mode"], "full");
        assert_eq!(page["data"][0]["name"], "A");
    }

    #[tokio::test]
    async fn test_minimal_mode_projects_fields() {
        let transport = ScriptedTransport::new(vec![Ok(json!({
            "data": [{ "uri": "/videos/1", "name": "A", "description": "long text" }]
        }))]);
        let client = client(&transport);

        let page = fetch(&client, ListVideosParams::default(), ListMode::Minimal)
            .await
            .unwrap();
        assert_eq!(page["_meta"]["response_mode"], "minimal");
        assert!(page["data"][0].get("description").is_none());
    }
}
