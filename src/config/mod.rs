//! Configuration module for vimeo-mcp.
//!
//! Handles loading settings from TOML and resolving API credentials.

mod settings;

pub use settings::{Credentials, GeneralSettings, OutputSettings, Settings, VimeoSettings};
