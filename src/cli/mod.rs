//! CLI module for vimeo-mcp.

pub mod commands;
mod output;

pub use output::Output;

use crate::captions::CaptionFormat;
use crate::vimeo::{SortDirection, SortOrder};
use clap::{Parser, Subcommand, ValueEnum};

/// vimeo-mcp - Vimeo for AI assistants
///
/// Serves a Vimeo account's videos, metadata, captions and statistics over the
/// Model Context Protocol, with a few direct commands for the terminal.
#[derive(Parser, Debug)]
#[command(name = "vimeo-mcp")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Listing detail level for the `list` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListMode {
    Minimal,
    Compact,
    Full,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start MCP server on stdio for AI assistant integration (Claude, etc.)
    Mcp,

    /// Serve MCP over HTTP (single JSON-RPC request per POST)
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },

    /// Check credentials, connectivity and configuration
    Doctor,

    /// List videos on the account
    List {
        /// Page number
        #[arg(long, default_value = "1")]
        page: u32,

        /// Videos per page (clamped to the mode's maximum)
        #[arg(short = 'n', long)]
        per_page: Option<u32>,

        /// Search query
        #[arg(short, long)]
        query: Option<String>,

        /// Sort order
        #[arg(long, value_parser = parse_sort)]
        sort: Option<SortOrder>,

        /// Sort direction
        #[arg(long, value_parser = parse_direction)]
        direction: Option<SortDirection>,

        /// Response detail level
        #[arg(short, long, value_enum, default_value = "minimal")]
        mode: ListMode,

        /// Print the shaped JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Download captions for a video
    Transcript {
        /// Video ID or vimeo.com URL
        video_id: String,

        /// Language code
        #[arg(short, long, default_value = "en")]
        language: String,

        /// Caption format (webvtt, srt)
        #[arg(short, long, default_value = "webvtt")]
        format: CaptionFormat,

        /// Save into the output folder instead of printing
        #[arg(short, long)]
        save: bool,

        /// Base directory when saving (defaults to the configured output path)
        #[arg(long)]
        base_path: Option<String>,
    },

    /// Analyse a video's captions and write a suggestion report
    Analyze {
        /// Video ID or vimeo.com URL
        video_id: String,

        /// Base directory for the report (defaults to the configured output path)
        #[arg(long)]
        base_path: Option<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration (secrets masked)
    Show,

    /// Write the current configuration to the config file
    Init,

    /// Show configuration file path
    Path,
}

fn parse_sort(s: &str) -> Result<SortOrder, String> {
    serde_json::from_value(serde_json::Value::from(s.to_lowercase()))
        .map_err(|_| format!("Unknown sort order: {}", s))
}

fn parse_direction(s: &str) -> Result<SortDirection, String> {
    serde_json::from_value(serde_json::Value::from(s.to_lowercase()))
        .map_err(|_| format!("Unknown sort direction: {}", s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_args() {
        let cli = Cli::parse_from([
            "vimeo-mcp", "list", "--sort", "plays", "--direction", "DESC", "-n", "5", "--mode", "compact",
        ]);
        match cli.command {
            Commands::List {
                sort,
                direction,
                per_page,
                mode,
                page,
                ..
            } => {
                assert_eq!(sort, Some(SortOrder::Plays));
                assert_eq!(direction, Some(SortDirection::Desc));
                assert_eq!(per_page, Some(5));
                assert_eq!(mode, ListMode::Compact);
                assert_eq!(page, 1);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_parse_transcript_args() {
        let cli = Cli::parse_from(["vimeo-mcp", "-vv", "transcript", "123", "-f", "srt", "--save"]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Transcript { video_id, format, save, language, .. } => {
                assert_eq!(video_id, "123");
                assert_eq!(format, CaptionFormat::Srt);
                assert!(save);
                assert_eq!(language, "en");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_bad_sort_is_rejected() {
        assert!(Cli::try_parse_from(["vimeo-mcp", "list", "--sort", "random"]).is_err());
    }
}
