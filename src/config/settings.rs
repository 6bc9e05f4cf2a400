//! Configuration settings for vimeo-mcp.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub vimeo: VimeoSettings,
    pub output: OutputSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
        }
    }
}

/// Vimeo API connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VimeoSettings {
    /// Base URL of the Vimeo API.
    pub api_base: String,
    /// Personal access token. Takes precedence over the client credentials.
    pub access_token: Option<String>,
    /// OAuth2 client identifier.
    pub client_id: Option<String>,
    /// OAuth2 client secret.
    pub client_secret: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for VimeoSettings {
    fn default() -> Self {
        Self {
            api_base: "https://api.vimeo.com".to_string(),
            access_token: None,
            client_id: None,
            client_secret: None,
            timeout_secs: 30,
        }
    }
}

/// Where transcripts and analysis reports are written.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Base directory for saved artifacts.
    pub base_path: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            base_path: "./downloads/vimeo".to_string(),
        }
    }
}

/// How the client authenticates against the API.
#[derive(Clone, PartialEq)]
pub enum Credentials {
    /// Personal access token.
    AccessToken(String),
    /// OAuth2 client credentials, exchanged for an app token on first use.
    ClientCredentials {
        client_id: String,
        client_secret: String,
    },
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::AccessToken(_) => f.write_str("AccessToken(..)"),
            Credentials::ClientCredentials { client_id, .. } => f
                .debug_struct("ClientCredentials")
                .field("client_id", client_id)
                .finish_non_exhaustive(),
        }
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    ///
    /// `VIMEO_ACCESS_TOKEN`, `VIMEO_CLIENT_ID` and `VIMEO_CLIENT_SECRET` override
    /// whatever the file contains.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        let mut settings = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            Settings::default()
        };

        settings.apply_env(|key| std::env::var(key).ok());
        Ok(settings)
    }

    /// Overlay credentials from the environment.
    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(token) = non_empty("VIMEO_ACCESS_TOKEN") {
            self.vimeo.access_token = Some(token);
        }
        if let Some(id) = non_empty("VIMEO_CLIENT_ID") {
            self.vimeo.client_id = Some(id);
        }
        if let Some(secret) = non_empty("VIMEO_CLIENT_SECRET") {
            self.vimeo.client_secret = Some(secret);
        }
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::VimeoError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vimeo-mcp")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded artifact base directory.
    pub fn base_path(&self) -> PathBuf {
        Self::expand_path(&self.output.base_path)
    }

    /// Resolve which credentials to use: an access token wins over a client id/secret pair.
    pub fn credentials(&self) -> crate::error::Result<Credentials> {
        let present = |v: &Option<String>| v.as_ref().filter(|s| !s.trim().is_empty()).cloned();

        if let Some(token) = present(&self.vimeo.access_token) {
            return Ok(Credentials::AccessToken(token));
        }

        match (present(&self.vimeo.client_id), present(&self.vimeo.client_secret)) {
            (Some(client_id), Some(client_secret)) => Ok(Credentials::ClientCredentials {
                client_id,
                client_secret,
            }),
            _ => Err(crate::error::VimeoError::Config(
                "Vimeo credentials not configured. Please set either VIMEO_ACCESS_TOKEN or both \
                 VIMEO_CLIENT_ID and VIMEO_CLIENT_SECRET environment variables."
                    .to_string(),
            )),
        }
    }
}
