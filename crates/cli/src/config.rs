//! CLI configuration utilities

use anyhow::{Context, Result};
use concierge_core::AuthSettings;
use std::path::{Path, PathBuf};

/// Environment variable overriding the state directory
pub const STATE_DIR_ENV: &str = "CONCIERGE_STATE_DIR";

/// Load settings, applying the `--api-url` override last
pub fn load_settings(path: Option<&Path>, api_url: Option<&str>) -> Result<AuthSettings> {
    let mut settings = AuthSettings::load(path).context("Failed to load configuration")?;
    if let Some(url) = api_url {
        settings.api_base_url = url.trim_end_matches('/').to_string();
    }
    settings.validate()?;
    Ok(settings)
}

/// Directory holding the cached login
pub fn state_dir(flag: Option<PathBuf>) -> PathBuf {
    resolve_state_dir(flag, std::env::var(STATE_DIR_ENV).ok())
}

fn resolve_state_dir(flag: Option<PathBuf>, env: Option<String>) -> PathBuf {
    flag.or_else(|| env.filter(|dir| !dir.is_empty()).map(PathBuf::from))
        .unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("concierge")
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn flag_beats_environment() {
        let dir = resolve_state_dir(Some("/tmp/flag".into()), Some("/tmp/env".into()));
        assert_eq!(dir, PathBuf::from("/tmp/flag"));

        let dir = resolve_state_dir(None, Some("/tmp/env".into()));
        assert_eq!(dir, PathBuf::from("/tmp/env"));
    }

    #[test]
    fn falls_back_to_data_dir() {
        let dir = resolve_state_dir(None, Some(String::new()));
        assert!(dir.ends_with("concierge"));
    }

    #[test]
    fn api_url_flag_overrides_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "api_base_url = \"https://file.example.com\"").unwrap();

        let settings = load_settings(Some(file.path()), None).unwrap();
        assert_eq!(settings.api_base_url, "https://file.example.com");

        let settings = load_settings(Some(file.path()), Some("https://flag.example.com/")).unwrap();
        assert_eq!(settings.api_base_url, "https://flag.example.com");
    }
}
