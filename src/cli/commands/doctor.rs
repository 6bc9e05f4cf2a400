//! Doctor command - verify credentials, connectivity and configuration.

use crate::cli::output::mask_secret;
use crate::cli::Output;
use crate::config::{Credentials, Settings};
use crate::vimeo::VimeoClient;
use console::style;
use std::path::PathBuf;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub async fn run_doctor(settings: &Settings, config_path: Option<&PathBuf>) -> anyhow::Result<()> {
    Output::header("Vimeo MCP Doctor");
    println!();
    println!("Checking credentials and configuration...\n");

    let mut checks = Vec::new();

    println!("{}", style("Credentials").bold());
    let credentials_check = check_credentials(settings);
    credentials_check.print();
    let have_credentials = credentials_check.status != CheckStatus::Error;
    checks.push(credentials_check);

    println!();

    println!("{}", style("Connectivity").bold());
    let connectivity_check = if have_credentials {
        check_connectivity(settings).await
    } else {
        CheckResult::warning(
            "Vimeo API",
            "skipped",
            "Configure credentials to test the connection",
        )
    };
    connectivity_check.print();
    checks.push(connectivity_check);

    println!();

    println!("{}", style("Directories").bold());
    let dir_check = check_output_dir(settings);
    dir_check.print();
    checks.push(dir_check);

    println!();

    println!("{}", style("Configuration").bold());
    let path = config_path
        .cloned()
        .unwrap_or_else(Settings::default_config_path);
    let config_check = check_config_file(&path);
    config_check.print();
    checks.push(config_check);

    println!();

    // Summary
    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before starting the server.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! The server is ready to use.");
    }

    Ok(())
}

/// Which credentials will be used, with the secret part masked.
fn check_credentials(settings: &Settings) -> CheckResult {
    match settings.credentials() {
        Ok(Credentials::AccessToken(token)) => CheckResult::ok(
            "Access token",
            &format!("configured ({})", mask_secret(&token)),
        ),
        Ok(Credentials::ClientCredentials { client_id, .. }) => CheckResult::ok(
            "Client credentials",
            &format!("configured (client id {})", client_id),
        ),
        Err(_) => CheckResult::error(
            "Credentials",
            "not set",
            "Set with: export VIMEO_ACCESS_TOKEN='...' (or VIMEO_CLIENT_ID and VIMEO_CLIENT_SECRET)",
        ),
    }
}

/// One authenticated call against the API.
async fn check_connectivity(settings: &Settings) -> CheckResult {
    let client = match VimeoClient::from_settings(settings) {
        Ok(client) => client,
        Err(e) => return CheckResult::error("Vimeo API", &e.to_string(), "Check the [vimeo] section"),
    };

    let spinner = Output::spinner("Contacting Vimeo...");
    let result = client.ping().await;
    spinner.finish_and_clear();

    match result {
        Ok(()) => CheckResult::ok("Vimeo API", &format!("connected ({})", settings.vimeo.api_base)),
        Err(e) if e.retry_after().is_some() => CheckResult::warning(
            "Vimeo API",
            &e.to_string(),
            "Rate limited; try again shortly",
        ),
        Err(e) => CheckResult::error(
            "Vimeo API",
            &e.to_string(),
            "Check the token's scopes and the api_base setting",
        ),
    }
}

/// Check the artifact directory.
fn check_output_dir(settings: &Settings) -> CheckResult {
    let base = settings.base_path();
    if base.is_dir() {
        CheckResult::ok("Output directory", &format!("{}", base.display()))
    } else {
        CheckResult::warning(
            "Output directory",
            &format!("{} (will be created)", base.display()),
            "Directory will be created on first download",
        )
    }
}

/// Check if config file exists.
fn check_config_file(path: &PathBuf) -> CheckResult {
    if path.exists() {
        CheckResult::ok("Config file", &format!("{}", path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            "Create with: vimeo-mcp config init",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_result_ok() {
        let result = CheckResult::ok("test", "passed");
        assert_eq!(result.status, CheckStatus::Ok);
        assert!(result.hint.is_none());
    }

    #[test]
    fn test_check_result_error() {
        let result = CheckResult::error("test", "failed", "fix it");
        assert_eq!(result.status, CheckStatus::Error);
        assert_eq!(result.hint, Some("fix it".to_string()));
    }

    #[test]
    fn test_credentials_check_masks_token() {
        let mut settings = Settings::default();
        settings.vimeo.access_token = Some("abcdefghijklmnop".to_string());

        let result = check_credentials(&settings);
        assert_eq!(result.status, CheckStatus::Ok);
        assert!(result.message.contains("abcd...mnop"));
        assert!(!result.message.contains("efgh"));
    }

    #[test]
    fn test_missing_credentials_is_error() {
        let result = check_credentials(&Settings::default());
        assert_eq!(result.status, CheckStatus::Error);
    }

    #[tokio::test]
    async fn test_connectivity_against_mock_api() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/me/videos")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"{"data":[]}"#)
            .create_async()
            .await;

        let mut settings = Settings::default();
        settings.vimeo.api_base = server.url();
        settings.vimeo.access_token = Some("token".to_string());

        let result = check_connectivity(&settings).await;
        assert_eq!(result.status, CheckStatus::Ok);
        mock.assert_async().await;
    }

    #[test]
    fn test_config_file_check() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        assert_eq!(check_config_file(&path).status, CheckStatus::Warning);
        std::fs::write(&path, "").unwrap();
        assert_eq!(check_config_file(&path).status, CheckStatus::Ok);
    }
}
