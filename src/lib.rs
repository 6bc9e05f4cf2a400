//! vimeo-mcp - a Vimeo account as Model Context Protocol tools
//!
//! Lets an AI assistant browse, inspect and edit the videos of one Vimeo
//! account, and move their captions in and out.
//!
//! # Overview
//!
//! - List videos with token-budgeted response shaping
//! - Read video details and play statistics
//! - Update title, description, privacy and tags
//! - Download and upload captions as WebVTT or SRT
//! - Save transcripts and keyword-based content reports to disk
//!
//! # Architecture
//!
//! - `config` - Settings and credential resolution
//! - `vimeo` - API client: transport, rate-limit guard, per-concern operations
//! - `response` - Field filtering for listings
//! - `captions` - Text-track selection and WebVTT/SRT conversion
//! - `artifacts` - Dated on-disk layout for transcripts and reports
//! - `analysis` - Transcript classification and report rendering
//! - `mcp` - JSON-RPC 2.0 server exposing the tools
//!
//! # Example
//!
//! ```rust,no_run
//! use vimeo_mcp::config::Settings;
//! use vimeo_mcp::vimeo::{ListVideosParams, VimeoClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let client = VimeoClient::from_settings(&settings)?;
//!
//!     let page = client.list_videos_minimal(&ListVideosParams::default()).await?;
//!     println!("{}", serde_json::to_string_pretty(&page)?);
//!
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod artifacts;
pub mod captions;
pub mod cli;
pub mod config;
pub mod error;
pub mod mcp;
pub mod response;
pub mod vimeo;

pub use error::{Result, VimeoError};
