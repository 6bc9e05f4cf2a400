//! vimeo-mcp CLI entry point.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use vimeo_mcp::cli::{commands, Cli, Commands};
use vimeo_mcp::config::Settings;
use vimeo_mcp::vimeo::ListVideosParams;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.as_deref().map(PathBuf::from);
    let settings = Settings::load_from(config_path.as_ref())?;

    // stdout carries the MCP stream, so logs go to stderr
    let log_level = match cli.verbose {
        0 => settings.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("vimeo_mcp={}", log_level)),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match &cli.command {
        Commands::Mcp => {
            commands::run_mcp(settings).await?;
        }

        Commands::Serve { host, port } => {
            commands::run_serve(host, *port, settings).await?;
        }

        Commands::Doctor => {
            commands::run_doctor(&settings, config_path.as_ref()).await?;
        }

        Commands::List {
            page,
            per_page,
            query,
            sort,
            direction,
            mode,
            json,
        } => {
            let params = ListVideosParams {
                page: Some(*page),
                per_page: *per_page,
                query: query.clone(),
                sort: *sort,
                direction: *direction,
                ..Default::default()
            };
            commands::run_list(params, *mode, *json, settings).await?;
        }

        Commands::Transcript {
            video_id,
            language,
            format,
            save,
            base_path,
        } => {
            commands::run_transcript(video_id, language, *format, *save, base_path.as_deref(), settings)
                .await?;
        }

        Commands::Analyze { video_id, base_path } => {
            commands::run_analyze(video_id, base_path.as_deref(), settings).await?;
        }

        Commands::Config { action } => {
            commands::run_config(action, settings, config_path.as_ref())?;
        }
    }

    Ok(())
}
