//! Error types for vimeo-mcp.

use crate::vimeo::TransportError;
use thiserror::Error;

/// Library-level error type for Vimeo operations.
#[derive(Error, Debug)]
pub enum VimeoError {
    /// The upstream API returned 429, or the client is still cooling down from one.
    #[error("Rate limit exceeded. Please wait {retry_after_secs} seconds.")]
    RateLimited { retry_after_secs: u64 },

    /// Any other upstream failure that carried an HTTP status.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Network-level failure with no status code.
    #[error(transparent)]
    Transport(TransportError),

    #[error(
        "Tag update stopped after removing {removed}/{existing} and adding {added}/{requested} tags: {source}"
    )]
    TagsPartiallyApplied {
        removed: usize,
        existing: usize,
        added: usize,
        requested: usize,
        #[source]
        source: Box<VimeoError>,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl VimeoError {
    /// Shorthand for a 404-style API error.
    pub fn not_found(message: impl Into<String>) -> Self {
        VimeoError::Api {
            status: 404,
            message: message.into(),
        }
    }

    /// HTTP status associated with this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            VimeoError::RateLimited { .. } => Some(429),
            VimeoError::Api { status, .. } => Some(*status),
            VimeoError::TagsPartiallyApplied { source, .. } => source.status(),
            _ => None,
        }
    }

    /// Seconds the caller should wait, when this error stems from rate limiting.
    pub fn retry_after(&self) -> Option<u64> {
        match self {
            VimeoError::RateLimited { retry_after_secs } => Some(*retry_after_secs),
            VimeoError::TagsPartiallyApplied { source, .. } => source.retry_after(),
            _ => None,
        }
    }
}

/// Result type alias for Vimeo operations.
pub type Result<T> = std::result::Result<T, VimeoError>;
