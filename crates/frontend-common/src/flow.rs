//! Login and registration flow
//!
//! One [`AuthFlow`] drives a single form: validation, the API call, the cache
//! write and the redirect that follows. Navigation itself is left to the
//! caller, which receives a [`PendingRedirect`] and schedules it.

use crate::forms::{FieldErrors, LoginForm, RegistrationForm, messages};
use crate::services::AuthApi;
use concierge_core::{
    AuthCache, AuthCallbackParams, AuthMethod, AuthSettings, CacheStore, Clock, NewAuthCache,
    SystemClock,
};
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Where a form is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlowState {
    #[default]
    Idle,
    Validating,
    ValidationFailed,
    Submitting,
    Success,
    Failed,
    Redirecting,
}

impl FlowState {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::ValidationFailed => "validation_failed",
            Self::Submitting => "submitting",
            Self::Success => "success",
            Self::Failed => "failed",
            Self::Redirecting => "redirecting",
        }
    }

    /// Whether the form should be disabled
    #[must_use]
    pub const fn is_busy(self) -> bool {
        matches!(self, Self::Validating | Self::Submitting | Self::Redirecting)
    }

    /// State once the user edits the form again
    ///
    /// A shown failure returns to `Idle`; every other state is kept.
    #[must_use]
    pub const fn after_edit(self) -> Self {
        match self {
            Self::ValidationFailed | Self::Failed => Self::Idle,
            other => other,
        }
    }
}

impl fmt::Display for FlowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What produced a redirect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectSource {
    /// A still-valid cached login was reused on mount
    Cache,
    Login,
    Register,
    /// The API rejected the submission
    Error,
}

/// Navigation the caller should perform after `delay`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRedirect {
    pub url: String,
    pub delay: Duration,
    pub source: RedirectSource,
    pub params: AuthCallbackParams,
}

impl PendingRedirect {
    /// Delay in milliseconds, saturated for browser timers
    #[must_use]
    pub fn delay_ms(&self) -> u32 {
        u32::try_from(self.delay.as_millis()).unwrap_or(u32::MAX)
    }
}

/// Result of a mount check or a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowOutcome {
    /// Client-side validation failed; nothing was sent
    Invalid(FieldErrors),
    /// Authenticated; leave the page once the delay elapses
    Redirect {
        notice: String,
        redirect: PendingRedirect,
    },
    /// The API answered with a domain error
    Rejected {
        message: String,
        error_callback: PendingRedirect,
        /// Whether the caller should follow `error_callback`
        navigate: bool,
    },
    /// The API could not be reached or answered with something unexpected
    Failed { message: String },
}

impl FlowOutcome {
    /// Redirect the caller should schedule, if any
    #[must_use]
    pub const fn redirect(&self) -> Option<&PendingRedirect> {
        match self {
            Self::Redirect { redirect, .. } => Some(redirect),
            Self::Rejected {
                error_callback,
                navigate: true,
                ..
            } => Some(error_callback),
            _ => None,
        }
    }

    /// Toast-style message for the user, if any
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Invalid(_) => None,
            Self::Redirect { notice, .. } => Some(notice),
            Self::Rejected { message, .. } | Self::Failed { message } => Some(message),
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Redirect { .. })
    }
}

/// Drives one login or registration form
pub struct AuthFlow<A, S, C = SystemClock> {
    api: A,
    cache: AuthCache<S, C>,
    callback: Url,
    success_delay: Duration,
    cached_delay: Duration,
    navigate_on_error: bool,
    state: FlowState,
}

impl<A, S, C> AuthFlow<A, S, C>
where
    A: AuthApi,
    S: CacheStore,
    C: Clock,
{
    /// Create a flow redirecting to `callback`
    pub fn new(api: A, cache: AuthCache<S, C>, callback: Url, settings: &AuthSettings) -> Self {
        Self {
            api,
            cache,
            callback,
            success_delay: settings.success_redirect_delay(),
            cached_delay: settings.cached_redirect_delay(),
            navigate_on_error: settings.navigate_on_error,
            state: FlowState::Idle,
        }
    }

    #[must_use]
    pub const fn state(&self) -> FlowState {
        self.state
    }

    #[must_use]
    pub const fn cache(&self) -> &AuthCache<S, C> {
        &self.cache
    }

    #[must_use]
    pub const fn callback(&self) -> &Url {
        &self.callback
    }

    /// Reuse a still-valid cached login
    ///
    /// Returns a redirect carrying the cached token unless `force_login` is
    /// set or nothing valid is cached.
    pub fn on_mount(&mut self, force_login: bool) -> Option<FlowOutcome> {
        if force_login {
            info!("Forced login requested, ignoring cached session");
            return None;
        }

        let record = self.cache.fetch()?;
        let remaining = record.remaining_seconds_at(self.cache.clock().now_ms());
        info!(
            username = %record.username,
            remaining_secs = remaining,
            "Reusing cached login"
        );

        let params = AuthCallbackParams::token_success(
            self.cache.clock(),
            AuthMethod::Login,
            record.token,
            Some(record.token_type.as_str()),
            Some(remaining),
        );
        let redirect = self.redirect_to(params, RedirectSource::Cache, self.cached_delay);
        self.transition(FlowState::Redirecting);

        Some(FlowOutcome::Redirect {
            notice: format!("Already logged in as {}", record.username),
            redirect,
        })
    }

    /// Validate and submit the login form
    pub async fn submit_login(&mut self, form: &LoginForm) -> FlowOutcome {
        self.transition(FlowState::Validating);
        if let Err(errors) = form.validate() {
            return self.invalid(errors);
        }

        self.transition(FlowState::Submitting);
        let response = match self.api.login(&form.to_request()).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Login request failed");
                return self.fail(messages::LOGIN_FAILED);
            }
        };
        debug!(code = response.code, status = ?response.status, "Login response");

        if response.is_success() {
            let Some(token) = response.token.filter(|t| !t.is_empty()) else {
                warn!("Login succeeded without a token");
                return self.fail(messages::LOGIN_FAILED);
            };

            let mut entry = NewAuthCache::new(token.clone(), form.username.clone());
            if let Some(token_type) = response.token_type.as_deref() {
                entry = entry.token_type(token_type);
            }
            if let Some(expires_in) = response.expires_in {
                entry = entry.expires_in(expires_in);
            }
            self.cache.store(entry);

            let params = AuthCallbackParams::token_success(
                self.cache.clock(),
                AuthMethod::Login,
                token,
                response.token_type.as_deref(),
                response.expires_in,
            );
            let notice = response
                .message
                .unwrap_or_else(|| messages::LOGIN_SUCCESS.to_string());
            return self.succeed(notice, params, RedirectSource::Login);
        }

        let default = if response.is_invalid_credentials() {
            messages::INVALID_CREDENTIALS
        } else {
            messages::LOGIN_FAILED
        };
        let message = response.message.unwrap_or_else(|| default.to_string());
        self.reject(AuthMethod::Login, response.code, message)
    }

    /// Validate and submit the registration form
    ///
    /// Registration yields no token, so the cache is left alone.
    pub async fn submit_registration(&mut self, form: &RegistrationForm) -> FlowOutcome {
        self.transition(FlowState::Validating);
        if let Err(errors) = form.validate() {
            return self.invalid(errors);
        }

        self.transition(FlowState::Submitting);
        let response = match self.api.register(&form.to_request()).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Registration request failed");
                return self.fail(messages::REGISTER_FAILED);
            }
        };
        debug!(code = response.code, status = ?response.status, "Registration response");

        if response.is_success() {
            let params = AuthCallbackParams::identity_success(
                self.cache.clock(),
                AuthMethod::Register,
                response.user.as_ref(),
                Some(form.email.trim()),
            );
            let notice = response
                .message
                .unwrap_or_else(|| messages::REGISTER_SUCCESS.to_string());
            return self.succeed(notice, params, RedirectSource::Register);
        }

        let default = if response.is_conflict() {
            messages::EMAIL_EXISTS
        } else {
            messages::REGISTER_FAILED
        };
        let message = response.message.unwrap_or_else(|| default.to_string());
        self.reject(AuthMethod::Register, response.code, message)
    }

    /// Forget the cached login
    pub fn logout(&mut self) {
        info!("Logging out");
        self.cache.clear();
        self.transition(FlowState::Idle);
    }

    /// Return to `Idle` after a failure has been shown
    pub fn reset(&mut self) {
        self.transition(self.state.after_edit());
    }

    fn transition(&mut self, next: FlowState) {
        if self.state != next {
            info!(from = %self.state, to = %next, "Auth flow transition");
            self.state = next;
        }
    }

    fn redirect_to(
        &self,
        params: AuthCallbackParams,
        source: RedirectSource,
        delay: Duration,
    ) -> PendingRedirect {
        PendingRedirect {
            url: params.apply_to(&self.callback).into(),
            delay,
            source,
            params,
        }
    }

    fn invalid(&mut self, errors: FieldErrors) -> FlowOutcome {
        debug!(fields = errors.len(), "Form validation failed");
        self.transition(FlowState::ValidationFailed);
        FlowOutcome::Invalid(errors)
    }

    fn succeed(
        &mut self,
        notice: String,
        params: AuthCallbackParams,
        source: RedirectSource,
    ) -> FlowOutcome {
        self.transition(FlowState::Success);
        let redirect = self.redirect_to(params, source, self.success_delay);
        self.transition(FlowState::Redirecting);
        FlowOutcome::Redirect { notice, redirect }
    }

    fn reject(&mut self, method: AuthMethod, code: u16, message: String) -> FlowOutcome {
        let params =
            AuthCallbackParams::error(self.cache.clock(), method, code.to_string(), &message);
        let error_callback = self.redirect_to(params, RedirectSource::Error, self.success_delay);
        let navigate = self.navigate_on_error;

        self.transition(FlowState::Failed);
        if navigate {
            self.transition(FlowState::Redirecting);
        }

        FlowOutcome::Rejected {
            message,
            error_callback,
            navigate,
        }
    }

    fn fail(&mut self, message: &str) -> FlowOutcome {
        self.transition(FlowState::Failed);
        FlowOutcome::Failed {
            message: message.to_string(),
        }
    }
}
