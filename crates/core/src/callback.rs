//! Callback URL protocol
//!
//! After a login or registration the browser is sent back to the application
//! that started the flow. The outcome travels as query parameters on that
//! callback URL:
//!
//! - always: `auth_status`, `auth_method`, `timestamp`
//! - token success: `token`, `token_type`, `expires_in`
//! - identity success: `user_id`, `username`
//! - error: `error_code`, `error_message`
//!
//! Optional parameters that are absent or empty are left out of the URL.
//! The identity fields are the exception: consumers rely on them being
//! present after registration, so they are written even when empty.

use crate::cache::DEFAULT_TOKEN_TYPE;
use crate::clock::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use url::Url;

/// Callback URL errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CallbackError {
    /// The base URL is not an absolute URL
    #[error("Invalid callback URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A required parameter is missing from a callback URL
    #[error("Missing callback parameter: {0}")]
    MissingParameter(&'static str),

    /// A parameter holds a value outside its allowed set
    #[error("Invalid value for callback parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: String },

    /// The callback does not use `http` or `https`
    #[error("Unsupported callback URL scheme: {0}")]
    UnsupportedScheme(String),
}

/// Outcome of the flow
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthStatus {
    Success,
    Error,
}

impl AuthStatus {
    /// Wire representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for AuthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthStatus {
    type Err = CallbackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(Self::Success),
            "error" => Ok(Self::Error),
            other => Err(CallbackError::InvalidParameter {
                name: "auth_status",
                value: other.to_string(),
            }),
        }
    }
}

/// Which form produced the outcome
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMethod {
    Login,
    Register,
}

impl AuthMethod {
    /// Wire representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Register => "register",
        }
    }
}

impl fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthMethod {
    type Err = CallbackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "login" => Ok(Self::Login),
            "register" => Ok(Self::Register),
            other => Err(CallbackError::InvalidParameter {
                name: "auth_method",
                value: other.to_string(),
            }),
        }
    }
}

/// User identity as returned by the registration endpoint
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// Outcome-specific callback fields
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CallbackPayload {
    Token {
        token: String,
        token_type: String,
        expires_in: Option<String>,
    },
    Identity {
        user_id: String,
        username: String,
    },
    Error {
        error_code: String,
        error_message: String,
    },
}

/// Full set of parameters appended to a callback URL
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthCallbackParams {
    pub auth_status: AuthStatus,
    pub auth_method: AuthMethod,
    /// Milliseconds since the UNIX epoch, captured when the params were built
    pub timestamp: String,
    pub payload: CallbackPayload,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn push_present<'a>(
    pairs: &mut Vec<(&'static str, &'a str)>,
    name: &'static str,
    value: Option<&'a str>,
) {
    if let Some(value) = non_empty(value) {
        pairs.push((name, value));
    }
}

impl AuthCallbackParams {
    /// Success carrying the issued token
    pub fn token_success<C: Clock + ?Sized>(
        clock: &C,
        method: AuthMethod,
        token: impl Into<String>,
        token_type: Option<&str>,
        expires_in: Option<u64>,
    ) -> Self {
        Self {
            auth_status: AuthStatus::Success,
            auth_method: method,
            timestamp: clock.now_ms().to_string(),
            payload: CallbackPayload::Token {
                token: token.into(),
                token_type: non_empty(token_type)
                    .unwrap_or(DEFAULT_TOKEN_TYPE)
                    .to_string(),
                expires_in: expires_in.map(|secs| secs.to_string()),
            },
        }
    }

    /// Success carrying the user's identity instead of a token
    ///
    /// `user_id` and `username` are always set: a missing user yields an empty
    /// id and the fallback username (or an empty one).
    pub fn identity_success<C: Clock + ?Sized>(
        clock: &C,
        method: AuthMethod,
        user: Option<&UserSummary>,
        fallback_username: Option<&str>,
    ) -> Self {
        let user_id = user.and_then(|u| non_empty(u.id.as_deref())).unwrap_or("");
        let username = user
            .and_then(|u| non_empty(u.username.as_deref()))
            .or_else(|| non_empty(fallback_username))
            .unwrap_or("");

        Self {
            auth_status: AuthStatus::Success,
            auth_method: method,
            timestamp: clock.now_ms().to_string(),
            payload: CallbackPayload::Identity {
                user_id: user_id.to_string(),
                username: username.to_string(),
            },
        }
    }

    /// Failure with a machine-readable code and a human-readable message
    pub fn error<C: Clock + ?Sized>(
        clock: &C,
        method: AuthMethod,
        error_code: impl Into<String>,
        error_message: impl Into<String>,
    ) -> Self {
        Self {
            auth_status: AuthStatus::Error,
            auth_method: method,
            timestamp: clock.now_ms().to_string(),
            payload: CallbackPayload::Error {
                error_code: error_code.into(),
                error_message: error_message.into(),
            },
        }
    }

    /// Parameters that end up in the query string, in a stable order
    ///
    /// Absent and empty optional values are skipped.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        let mut pairs: Vec<(&'static str, &str)> = vec![
            ("auth_status", self.auth_status.as_str()),
            ("auth_method", self.auth_method.as_str()),
        ];
        push_present(&mut pairs, "timestamp", Some(&self.timestamp));

        match &self.payload {
            CallbackPayload::Token {
                token,
                token_type,
                expires_in,
            } => {
                push_present(&mut pairs, "token", Some(token));
                push_present(&mut pairs, "token_type", Some(token_type));
                push_present(&mut pairs, "expires_in", expires_in.as_deref());
            }
            CallbackPayload::Identity { user_id, username } => {
                pairs.push(("user_id", user_id));
                pairs.push(("username", username));
            }
            CallbackPayload::Error {
                error_code,
                error_message,
            } => {
                push_present(&mut pairs, "error_code", Some(error_code));
                push_present(&mut pairs, "error_message", Some(error_message));
            }
        }

        pairs
    }

    /// Return `base` with these parameters set on its query string
    ///
    /// Parameters already on `base` with the same names are replaced; any other
    /// existing parameters are kept.
    #[must_use]
    pub fn apply_to(&self, base: &Url) -> Url {
        let pairs = self.query_pairs();
        let retained: Vec<(String, String)> = base
            .query_pairs()
            .filter(|(name, _)| !pairs.iter().any(|(ours, _)| ours == name))
            .map(|(name, value)| (name.into_owned(), value.into_owned()))
            .collect();

        let mut url = base.clone();
        url.query_pairs_mut()
            .clear()
            .extend_pairs(retained)
            .extend_pairs(pairs);
        url
    }

    /// Decode parameters from a callback URL
    ///
    /// # Errors
    ///
    /// Returns an error if a required parameter is missing or holds an
    /// unknown status or method.
    pub fn from_url(url: &Url) -> Result<Self, CallbackError> {
        let lookup = |name: &str| -> Option<String> {
            url.query_pairs()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.into_owned())
        };
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.is_empty())
                .ok_or(CallbackError::MissingParameter(name))
        };

        let auth_status: AuthStatus = required("auth_status")?.parse()?;
        let auth_method: AuthMethod = required("auth_method")?.parse()?;
        let timestamp = required("timestamp")?;

        let payload = if auth_status == AuthStatus::Error {
            CallbackPayload::Error {
                error_code: lookup("error_code").unwrap_or_default(),
                error_message: lookup("error_message").unwrap_or_default(),
            }
        } else if let Some(token) = lookup("token").filter(|t| !t.is_empty()) {
            CallbackPayload::Token {
                token,
                token_type: lookup("token_type")
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| DEFAULT_TOKEN_TYPE.to_string()),
                expires_in: lookup("expires_in").filter(|e| !e.is_empty()),
            }
        } else {
            CallbackPayload::Identity {
                user_id: lookup("user_id").unwrap_or_default(),
                username: lookup("username").unwrap_or_default(),
            }
        };

        Ok(Self {
            auth_status,
            auth_method,
            timestamp,
            payload,
        })
    }

    /// Value of a named parameter as it would appear in the URL
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.query_pairs()
            .into_iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
    }
}

/// Build a callback URL string from a base URL and outcome parameters
///
/// # Errors
///
/// Returns [`CallbackError::InvalidUrl`] when `base_url` is not absolute.
pub fn build_url(base_url: &str, params: &AuthCallbackParams) -> Result<String, CallbackError> {
    let base = Url::parse(base_url)?;
    Ok(params.apply_to(&base).into())
}

/// Decode a callback URL string
///
/// # Errors
///
/// Returns an error if the URL does not parse or lacks required parameters.
pub fn parse_url(url: &str) -> Result<AuthCallbackParams, CallbackError> {
    AuthCallbackParams::from_url(&Url::parse(url)?)
}

/// Resolve a `callback` query value against the page origin
///
/// Absolute URLs are used as is; relative ones (the default is `/`) are joined
/// onto `origin`. Only `http` and `https` callbacks are accepted.
///
/// # Errors
///
/// Returns an error if the value is relative and no origin is available, if
/// joining fails, or if the resolved URL has another scheme.
pub fn resolve_callback(raw: &str, origin: Option<&Url>) -> Result<Url, CallbackError> {
    let url = match Url::parse(raw) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => match origin {
            Some(origin) => origin.join(raw)?,
            None => {
                return Err(CallbackError::InvalidUrl(
                    url::ParseError::RelativeUrlWithoutBase,
                ));
            }
        },
        Err(e) => return Err(e.into()),
    };
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(CallbackError::UnsupportedScheme(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::MockClock;

    const CALLBACK: &str = "http://localhost:3001/auth/callback";

    fn clock() -> MockClock {
        MockClock::new(1_642_780_800_000)
    }

    fn query(url: &str) -> Vec<(String, String)> {
        Url::parse(url)
            .unwrap()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    fn value<'a>(pairs: &'a [(String, String)], name: &str) -> Option<&'a str> {
        pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn token_success_defaults_type_and_omits_expiry() {
        let params =
            AuthCallbackParams::token_success(&clock(), AuthMethod::Login, "tok", None, None);

        assert_eq!(params.auth_status, AuthStatus::Success);
        assert_eq!(params.timestamp, "1642780800000");
        assert_eq!(
            params.payload,
            CallbackPayload::Token {
                token: "tok".to_string(),
                token_type: "bearer".to_string(),
                expires_in: None,
            }
        );

        let url = build_url(CALLBACK, &params).unwrap();
        let pairs = query(&url);
        assert_eq!(value(&pairs, "token_type"), Some("bearer"));
        assert_eq!(value(&pairs, "expires_in"), None);
        assert_eq!(value(&pairs, "user_id"), None);
    }

    #[test]
    fn token_success_stringifies_expiry() {
        let params = AuthCallbackParams::token_success(
            &clock(),
            AuthMethod::Login,
            "tok",
            Some("mac"),
            Some(3600),
        );
        let url = build_url(CALLBACK, &params).unwrap();

        assert_eq!(
            url,
            "http://localhost:3001/auth/callback?auth_status=success&auth_method=login\
             &timestamp=1642780800000&token=tok&token_type=mac&expires_in=3600"
        );
    }

    #[test]
    fn identity_success_prefers_user_then_fallback() {
        let user = UserSummary {
            id: Some("u1".to_string()),
            username: None,
        };
        let params = AuthCallbackParams::identity_success(
            &clock(),
            AuthMethod::Register,
            Some(&user),
            Some("fallback@x.com"),
        );

        assert_eq!(
            params.payload,
            CallbackPayload::Identity {
                user_id: "u1".to_string(),
                username: "fallback@x.com".to_string(),
            }
        );
    }

    #[test]
    fn identity_success_without_user_keeps_empty_id() {
        let params = AuthCallbackParams::identity_success(
            &clock(),
            AuthMethod::Register,
            None,
            Some("fallback@x.com"),
        );
        assert_eq!(
            params.payload,
            CallbackPayload::Identity {
                user_id: String::new(),
                username: "fallback@x.com".to_string(),
            }
        );

        let pairs = query(&build_url(CALLBACK, &params).unwrap());
        assert_eq!(value(&pairs, "user_id"), Some(""));
        assert_eq!(value(&pairs, "username"), Some("fallback@x.com"));
    }

    #[test]
    fn identity_success_treats_empty_username_as_missing() {
        let user = UserSummary {
            id: Some("u2".to_string()),
            username: Some(String::new()),
        };
        let params =
            AuthCallbackParams::identity_success(&clock(), AuthMethod::Register, Some(&user), None);

        assert_eq!(params.get("username"), Some(""));
        assert_eq!(params.get("user_id"), Some("u2"));
    }

    #[test]
    fn error_params_omit_empty_message() {
        let params = AuthCallbackParams::error(&clock(), AuthMethod::Login, "401", "");
        let pairs = query(&build_url(CALLBACK, &params).unwrap());

        assert_eq!(value(&pairs, "auth_status"), Some("error"));
        assert_eq!(value(&pairs, "error_code"), Some("401"));
        assert_eq!(value(&pairs, "error_message"), None);
    }

    #[test]
    fn existing_query_is_kept_and_overridden() {
        let base = "https://app.example.com/cb?tenant=7&auth_status=stale#top";
        let params = AuthCallbackParams::error(
            &clock(),
            AuthMethod::Register,
            "409",
            "Email already registered",
        );
        let url = build_url(base, &params).unwrap();
        let pairs = query(&url);

        assert_eq!(value(&pairs, "tenant"), Some("7"));
        assert_eq!(value(&pairs, "auth_status"), Some("error"));
        assert_eq!(
            pairs.iter().filter(|(k, _)| k == "auth_status").count(),
            1
        );
        assert_eq!(value(&pairs, "error_message"), Some("Email already registered"));
        assert!(url.ends_with("#top"));
    }

    #[test]
    fn relative_base_is_rejected() {
        let params = AuthCallbackParams::error(&clock(), AuthMethod::Login, "500", "boom");
        assert_eq!(
            build_url("/", &params),
            Err(CallbackError::InvalidUrl(url::ParseError::RelativeUrlWithoutBase))
        );
    }

    #[test]
    fn timestamp_is_fixed_at_construction() {
        let clock = clock();
        let params = AuthCallbackParams::token_success(&clock, AuthMethod::Login, "t", None, None);

        clock.advance_ms(60_000);
        let pairs = query(&build_url(CALLBACK, &params).unwrap());
        assert_eq!(value(&pairs, "timestamp"), Some("1642780800000"));
    }

    #[test]
    fn parse_reads_back_token_callback() {
        let url = "http://localhost:3001/auth/callback?auth_status=success&auth_method=login\
                   &timestamp=1642780800000&token=abc&expires_in=900";
        let params = parse_url(url).unwrap();

        assert_eq!(params.auth_method, AuthMethod::Login);
        assert_eq!(
            params.payload,
            CallbackPayload::Token {
                token: "abc".to_string(),
                token_type: "bearer".to_string(),
                expires_in: Some("900".to_string()),
            }
        );
    }

    #[test]
    fn parse_rejects_missing_and_unknown_values() {
        assert_eq!(
            parse_url("https://app.example.com/cb?auth_method=login&timestamp=1"),
            Err(CallbackError::MissingParameter("auth_status"))
        );
        assert_eq!(
            parse_url("https://app.example.com/cb?auth_status=ok&auth_method=login&timestamp=1"),
            Err(CallbackError::InvalidParameter {
                name: "auth_status",
                value: "ok".to_string()
            })
        );
    }

    #[test]
    fn resolve_callback_joins_relative_paths() {
        let origin = Url::parse("https://auth.example.com").unwrap();

        assert_eq!(
            resolve_callback("/", Some(&origin)).unwrap().as_str(),
            "https://auth.example.com/"
        );
        assert_eq!(
            resolve_callback(CALLBACK, Some(&origin)).unwrap().as_str(),
            CALLBACK
        );
        assert!(resolve_callback("/dashboard", None).is_err());
    }

    #[test]
    fn resolve_callback_rejects_script_schemes() {
        let origin = Url::parse("https://auth.example.com").unwrap();

        assert_eq!(
            resolve_callback("javascript:alert(localStorage.auth_cache)//", Some(&origin)),
            Err(CallbackError::UnsupportedScheme("javascript".to_string()))
        );
        assert_eq!(
            resolve_callback("data:text/html,<script>1</script>", None),
            Err(CallbackError::UnsupportedScheme("data".to_string()))
        );
        assert!(resolve_callback("HTTPS://app.example.com/cb", None).is_ok());
    }
}
