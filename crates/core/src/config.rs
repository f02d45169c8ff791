//! Front-end configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::cache::AUTH_CACHE_KEY;

/// Environment variable overriding the Auth API base URL
pub const API_BASE_URL_ENV: &str = "CONCIERGE_API_BASE_URL";

/// Auth API used by release builds when no override is set
pub const PRODUCTION_API_BASE_URL: &str = "https://api.concierge-apartments.com";

/// Auth API used by debug builds when no override is set
pub const DEVELOPMENT_API_BASE_URL: &str = "http://localhost:8000";

/// Pick the Auth API base URL
///
/// A non-blank override wins, then the production default for release builds,
/// then the local development server.
#[must_use]
pub fn resolve_api_base_url(override_url: Option<&str>, production: bool) -> String {
    match override_url.map(str::trim).filter(|url| !url.is_empty()) {
        Some(url) => url.trim_end_matches('/').to_string(),
        None if production => PRODUCTION_API_BASE_URL.to_string(),
        None => DEVELOPMENT_API_BASE_URL.to_string(),
    }
}

/// Base URL from the runtime environment (native) or the build environment
#[must_use]
pub fn default_api_base_url() -> String {
    #[cfg(not(target_arch = "wasm32"))]
    let runtime = std::env::var(API_BASE_URL_ENV).ok();
    #[cfg(target_arch = "wasm32")]
    let runtime: Option<String> = None;

    let override_url = runtime
        .as_deref()
        .or(option_env!("CONCIERGE_API_BASE_URL"));
    resolve_api_base_url(override_url, !cfg!(debug_assertions))
}

/// Authentication front-end settings
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    /// Auth API base URL, without trailing slash
    pub api_base_url: String,
    /// Storage key of the cached record
    pub cache_key: String,
    /// Delay before leaving the page after a successful submission
    pub success_redirect_delay_ms: u64,
    /// Delay before leaving the page when a cached login is reused
    pub cached_redirect_delay_ms: u64,
    /// Navigate to the error callback after an authentication failure
    pub navigate_on_error: bool,
    /// Auth API request timeout (native only)
    pub request_timeout_secs: u64,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            cache_key: AUTH_CACHE_KEY.to_string(),
            success_redirect_delay_ms: 1200,
            cached_redirect_delay_ms: 1500,
            navigate_on_error: false,
            request_timeout_secs: 30,
        }
    }
}

impl AuthSettings {
    /// Delay before redirecting after a fresh login or registration
    #[must_use]
    pub const fn success_redirect_delay(&self) -> Duration {
        Duration::from_millis(self.success_redirect_delay_ms)
    }

    /// Delay before redirecting with a cached login
    #[must_use]
    pub const fn cached_redirect_delay(&self) -> Duration {
        Duration::from_millis(self.cached_redirect_delay_ms)
    }

    /// Auth API request timeout
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use loader::ConfigError;

#[cfg(not(target_arch = "wasm32"))]
mod loader {
    use super::AuthSettings;
    use std::path::Path;
    use thiserror::Error;

    /// Settings loading errors
    #[derive(Debug, Error)]
    pub enum ConfigError {
        /// A source could not be read or deserialized
        #[error("Failed to load settings: {0}")]
        Load(#[from] config::ConfigError),

        /// A value parsed but is unusable
        #[error("Invalid setting {key}: {message}")]
        Invalid { key: &'static str, message: String },
    }

    impl AuthSettings {
        /// Load settings from defaults, an optional file and `CONCIERGE_*`
        /// environment variables, in increasing priority
        ///
        /// # Errors
        ///
        /// Returns an error if the file cannot be read, a value cannot be
        /// parsed, or the resulting settings are invalid
        pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
            let defaults = Self::default();

            let mut builder = config::Config::builder()
                .set_default("api_base_url", defaults.api_base_url)?
                .set_default("cache_key", defaults.cache_key)?
                .set_default(
                    "success_redirect_delay_ms",
                    defaults.success_redirect_delay_ms,
                )?
                .set_default("cached_redirect_delay_ms", defaults.cached_redirect_delay_ms)?
                .set_default("navigate_on_error", defaults.navigate_on_error)?
                .set_default("request_timeout_secs", defaults.request_timeout_secs)?;

            if let Some(path) = path {
                builder = builder.add_source(config::File::from(path));
            }

            let settings: Self = builder
                .add_source(config::Environment::with_prefix("CONCIERGE").try_parsing(true))
                .build()?
                .try_deserialize()?;

            settings.validate()?;
            Ok(settings)
        }

        /// Check values that deserialize but cannot work
        ///
        /// # Errors
        ///
        /// Returns [`ConfigError::Invalid`] for an unparseable API URL or a
        /// cache key that a store cannot hold
        pub fn validate(&self) -> Result<(), ConfigError> {
            if let Err(e) = url::Url::parse(&self.api_base_url) {
                return Err(ConfigError::Invalid {
                    key: "api_base_url",
                    message: e.to_string(),
                });
            }
            if !crate::store::is_valid_key(&self.cache_key) {
                return Err(ConfigError::Invalid {
                    key: "cache_key",
                    message: format!(
                        "{:?} must be non-empty and use only letters, digits, '_' or '-'",
                        self.cache_key
                    ),
                });
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn override_wins_over_defaults() {
        assert_eq!(
            resolve_api_base_url(Some("https://custom-api.com/"), true),
            "https://custom-api.com"
        );
        assert_eq!(
            resolve_api_base_url(Some("https://custom-api.com"), false),
            "https://custom-api.com"
        );
    }

    #[test]
    fn blank_override_is_ignored() {
        assert_eq!(
            resolve_api_base_url(Some("  "), false),
            DEVELOPMENT_API_BASE_URL
        );
        assert_eq!(resolve_api_base_url(None, true), PRODUCTION_API_BASE_URL);
        assert_eq!(resolve_api_base_url(None, false), DEVELOPMENT_API_BASE_URL);
    }

    #[test]
    fn defaults_match_front_end_behavior() {
        let settings = AuthSettings::default();
        assert_eq!(settings.cache_key, "auth_cache");
        assert_eq!(settings.success_redirect_delay(), Duration::from_millis(1200));
        assert_eq!(settings.cached_redirect_delay(), Duration::from_millis(1500));
        assert!(!settings.navigate_on_error);
    }

    #[test]
    fn load_reads_file_over_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "api_base_url = \"https://auth.example.com\"\nnavigate_on_error = true\nsuccess_redirect_delay_ms = 10"
        )
        .unwrap();

        let settings = AuthSettings::load(Some(file.path())).unwrap();
        assert_eq!(settings.api_base_url, "https://auth.example.com");
        assert!(settings.navigate_on_error);
        assert_eq!(settings.success_redirect_delay_ms, 10);
        assert_eq!(settings.cached_redirect_delay_ms, 1500);
    }

    #[test]
    fn load_rejects_unparseable_api_url() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "api_base_url = \"not a url\"").unwrap();

        assert!(matches!(
            AuthSettings::load(Some(file.path())),
            Err(ConfigError::Invalid {
                key: "api_base_url",
                ..
            })
        ));
    }

    #[test]
    fn load_rejects_cache_key_a_store_cannot_hold() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "cache_key = \"auth.cache\"").unwrap();

        assert!(matches!(
            AuthSettings::load(Some(file.path())),
            Err(ConfigError::Invalid {
                key: "cache_key",
                ..
            })
        ));

        let settings = AuthSettings {
            cache_key: "session-cache_2".to_string(),
            ..AuthSettings::default()
        };
        assert!(settings.validate().is_ok());
    }
}
