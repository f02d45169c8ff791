//! Frontend configuration

use concierge_core::AuthSettings;

/// Page-level authentication configuration
pub struct AuthConfig;

impl AuthConfig {
    /// Query parameter holding the callback URL
    pub const CALLBACK_PARAM: &'static str = "callback";

    /// Query parameter that bypasses the cached-login redirect
    pub const FORCE_PARAM: &'static str = "force";

    /// Callback used when the page was opened without one
    pub const DEFAULT_CALLBACK: &'static str = "/";

    /// Refresh interval of the session inspection page in milliseconds
    pub const STATUS_REFRESH_INTERVAL_MS: u32 = 1_000;

    /// Settings for the browser build
    ///
    /// The API base URL is fixed at compile time; everything else uses the
    /// defaults.
    #[must_use]
    pub fn browser_settings() -> AuthSettings {
        AuthSettings::default()
    }

    /// Whether a `force` query value asks to skip the cached login
    #[must_use]
    pub fn is_forced(value: Option<&str>) -> bool {
        value == Some("true")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_true_forces_login() {
        assert!(AuthConfig::is_forced(Some("true")));
        assert!(!AuthConfig::is_forced(Some("TRUE")));
        assert!(!AuthConfig::is_forced(Some("1")));
        assert!(!AuthConfig::is_forced(Some("")));
        assert!(!AuthConfig::is_forced(None));
    }
}
