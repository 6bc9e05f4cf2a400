//! Config command implementation.

use crate::cli::output::mask_secret;
use crate::cli::{ConfigAction, Output};
use crate::config::Settings;
use anyhow::Result;
use std::path::PathBuf;

/// Run the config command.
pub fn run_config(action: &ConfigAction, settings: Settings, config_path: Option<&PathBuf>) -> Result<()> {
    let path = config_path
        .cloned()
        .unwrap_or_else(Settings::default_config_path);

    match action {
        ConfigAction::Show => {
            let toml_str = toml::to_string_pretty(&masked(settings))
                .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;
            println!("{}", toml_str);
        }

        ConfigAction::Init => {
            if path.exists() {
                Output::warning(&format!("Config already exists at {}", path.display()));
            } else {
                // Credentials picked up from the environment stay out of the file.
                let mut to_write = settings;
                to_write.vimeo.access_token = None;
                to_write.vimeo.client_id = None;
                to_write.vimeo.client_secret = None;
                to_write.save_to(&path)?;
                Output::success(&format!("Created default config at {}", path.display()));
            }
        }

        ConfigAction::Path => {
            println!("{}", path.display());
        }
    }

    Ok(())
}

fn masked(mut settings: Settings) -> Settings {
    let vimeo = &mut settings.vimeo;
    for secret in [&mut vimeo.access_token, &mut vimeo.client_secret] {
        if let Some(value) = secret.as_mut() {
            *value = mask_secret(value);
        }
    }
    settings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_masks_secrets() {
        let mut settings = Settings::default();
        settings.vimeo.access_token = Some("0123456789abcdef".to_string());
        settings.vimeo.client_id = Some("public-id".to_string());

        let shown = masked(settings);
        assert_eq!(shown.vimeo.access_token.as_deref(), Some("0123...cdef"));
        assert_eq!(shown.vimeo.client_id.as_deref(), Some("public-id"));
        assert!(shown.vimeo.client_secret.is_none());
    }

    #[test]
    fn test_init_writes_file_without_secrets() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut settings = Settings::default();
        settings.vimeo.access_token = Some("from-env".to_string());

        run_config(&ConfigAction::Init, settings, Some(&path)).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("api_base"));
        assert!(!written.contains("from-env"));
    }
}
