//! CLI commands

use anyhow::{Context, Result, bail};
use clap::{Subcommand, ValueEnum};
use concierge_core::{
    AuthCache, AuthCallbackParams, AuthMethod, AuthSettings, CacheStore, Clock, FileStore,
    SystemClock, UserSummary, parse_url, resolve_callback,
};
use concierge_frontend_common::{AuthFlow, FlowOutcome, LoginForm, RegistrationForm};
use concierge_http::AuthApiClient;
use std::path::PathBuf;
use tracing::info;
use url::Url;

/// Callback used when none is given on the command line
pub const DEFAULT_CALLBACK: &str = "http://localhost:3000/";

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and cache the issued token
    Login {
        /// Username or email
        #[arg(long)]
        username: String,

        #[arg(long, env = "CONCIERGE_PASSWORD", hide_env_values = true)]
        password: String,

        /// Application to return to
        #[arg(long, default_value = DEFAULT_CALLBACK)]
        callback: String,

        /// Ignore a still-valid cached login
        #[arg(long)]
        force: bool,
    },

    /// Create a resident account
    Register {
        /// Full name
        #[arg(long)]
        name: String,

        #[arg(long)]
        username: String,

        #[arg(long)]
        email: String,

        #[arg(long, env = "CONCIERGE_PASSWORD", hide_env_values = true)]
        password: String,

        #[arg(long)]
        phone: String,

        #[arg(long)]
        flat: String,

        #[arg(long)]
        building: String,

        /// Application to return to
        #[arg(long, default_value = DEFAULT_CALLBACK)]
        callback: String,
    },

    /// Show the cached login
    Status,

    /// Forget the cached login
    Logout,

    /// Build a callback URL for a given outcome
    CallbackUrl {
        /// Callback base URL
        base: String,

        #[arg(long, value_enum, default_value_t = MethodArg::Login)]
        method: MethodArg,

        #[command(subcommand)]
        outcome: CallbackOutcome,
    },

    /// Decode the authentication parameters of a callback URL
    ParseCallback {
        url: String,
    },
}

#[derive(Subcommand)]
pub enum CallbackOutcome {
    /// Success carrying a token
    Token {
        #[arg(long)]
        token: String,

        #[arg(long)]
        token_type: Option<String>,

        /// Validity in seconds
        #[arg(long)]
        expires_in: Option<u64>,
    },

    /// Success carrying the user's identity
    Identity {
        #[arg(long)]
        user_id: Option<String>,

        #[arg(long)]
        username: Option<String>,

        /// Username used when `--username` is absent
        #[arg(long)]
        fallback_username: Option<String>,
    },

    /// Failure
    Error {
        #[arg(long)]
        code: String,

        #[arg(long)]
        message: String,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum MethodArg {
    Login,
    Register,
}

impl From<MethodArg> for AuthMethod {
    fn from(method: MethodArg) -> Self {
        match method {
            MethodArg::Login => Self::Login,
            MethodArg::Register => Self::Register,
        }
    }
}

type CliFlow = AuthFlow<AuthApiClient, FileStore>;

/// Shared state of every command
pub struct AppContext {
    pub settings: AuthSettings,
    pub state_dir: PathBuf,
}

impl AppContext {
    fn cache(&self) -> AuthCache<FileStore> {
        AuthCache::new(FileStore::new(&self.state_dir)).with_key(self.settings.cache_key.clone())
    }

    fn flow(&self, callback: &str) -> Result<CliFlow> {
        let callback = resolve_callback(callback, None)
            .with_context(|| format!("Invalid callback URL: {callback}"))?;
        let api = AuthApiClient::builder()
            .base_url(self.settings.api_base_url.clone())
            .timeout(self.settings.request_timeout())
            .build()?;
        Ok(AuthFlow::new(api, self.cache(), callback, &self.settings))
    }
}

impl Commands {
    pub async fn execute(self, ctx: &AppContext) -> Result<()> {
        match self {
            Self::Login {
                username,
                password,
                callback,
                force,
            } => {
                let mut flow = ctx.flow(&callback)?;
                if let Some(outcome) = flow.on_mount(force) {
                    return report(&outcome);
                }
                let outcome = flow.submit_login(&LoginForm::new(username, password)).await;
                report(&outcome)
            }
            Self::Register {
                name,
                username,
                email,
                password,
                phone,
                flat,
                building,
                callback,
            } => {
                let form = RegistrationForm {
                    name,
                    username,
                    email,
                    password,
                    phone_number: phone,
                    flat_number: flat,
                    building_name: building,
                };
                let outcome = ctx.flow(&callback)?.submit_registration(&form).await;
                report(&outcome)
            }
            Self::Status => {
                print!("{}", status(&ctx.cache()));
                Ok(())
            }
            Self::Logout => {
                ctx.cache().clear();
                info!(state_dir = %ctx.state_dir.display(), "Cleared cached login");
                println!("Logged out");
                Ok(())
            }
            Self::CallbackUrl {
                base,
                method,
                outcome,
            } => {
                let base = Url::parse(&base).with_context(|| format!("Invalid URL: {base}"))?;
                let params = outcome.params(&SystemClock, method.into());
                println!("{}", params.apply_to(&base));
                Ok(())
            }
            Self::ParseCallback { url } => {
                let params = parse_url(&url)?;
                for (name, value) in params.query_pairs() {
                    println!("{name}={value}");
                }
                Ok(())
            }
        }
    }
}

impl CallbackOutcome {
    fn params<C: Clock>(self, clock: &C, method: AuthMethod) -> AuthCallbackParams {
        match self {
            Self::Token {
                token,
                token_type,
                expires_in,
            } => AuthCallbackParams::token_success(
                clock,
                method,
                token,
                token_type.as_deref(),
                expires_in,
            ),
            Self::Identity {
                user_id,
                username,
                fallback_username,
            } => {
                let user = UserSummary {
                    id: user_id,
                    username,
                };
                AuthCallbackParams::identity_success(
                    clock,
                    method,
                    Some(&user),
                    fallback_username.as_deref(),
                )
            }
            Self::Error { code, message } => {
                AuthCallbackParams::error(clock, method, code, message)
            }
        }
    }
}

fn status<S: CacheStore, C: Clock>(cache: &AuthCache<S, C>) -> String {
    let Some(record) = cache.fetch() else {
        return "Not authenticated\n".to_string();
    };
    let remaining = record.remaining_seconds_at(cache.clock().now_ms());
    format!(
        "Logged in as {}\nToken type: {}\nExpires in: {}m {}s\n",
        record.username,
        record.token_type,
        remaining / 60,
        remaining % 60
    )
}

fn report(outcome: &FlowOutcome) -> Result<()> {
    match outcome {
        FlowOutcome::Invalid(errors) => {
            for (field, message) in errors.iter() {
                eprintln!("{field}: {message}");
            }
            bail!("Invalid input")
        }
        FlowOutcome::Redirect { notice, redirect } => {
            println!("{notice}");
            println!("Redirect ({} ms): {}", redirect.delay.as_millis(), redirect.url);
            Ok(())
        }
        FlowOutcome::Rejected {
            message,
            error_callback,
            ..
        } => {
            eprintln!("Error callback: {}", error_callback.url);
            bail!("{message}")
        }
        FlowOutcome::Failed { message } => bail!("{message}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use concierge_core::{CallbackPayload, MockClock, NewAuthCache};

    #[test]
    fn identity_outcome_keeps_empty_fields() {
        let outcome = CallbackOutcome::Identity {
            user_id: None,
            username: None,
            fallback_username: Some("john@example.com".to_string()),
        };
        let params = outcome.params(&MockClock::new(1_000), AuthMethod::Register);
        let url = params.apply_to(&Url::parse("https://app.example.com/cb").unwrap());

        let decoded = parse_url(url.as_str()).unwrap();
        assert_eq!(
            decoded.payload,
            CallbackPayload::Identity {
                user_id: String::new(),
                username: "john@example.com".to_string(),
            }
        );
    }

    #[test]
    fn error_outcome_carries_code_and_message() {
        let outcome = CallbackOutcome::Error {
            code: "401".to_string(),
            message: "Invalid credentials".to_string(),
        };
        let params = outcome.params(&MockClock::new(1_000), AuthMethod::Login);

        assert_eq!(params.get("error_code"), Some("401"));
        assert_eq!(params.get("timestamp"), Some("1000"));
    }

    #[test]
    fn relative_callback_is_rejected() {
        let ctx = AppContext {
            settings: AuthSettings::default(),
            state_dir: PathBuf::from("."),
        };
        assert!(ctx.flow("/").is_err());
        assert!(ctx.flow(DEFAULT_CALLBACK).is_ok());
    }

    #[test]
    fn script_callback_is_rejected() {
        let ctx = AppContext {
            settings: AuthSettings::default(),
            state_dir: PathBuf::from("."),
        };
        assert!(ctx.flow("javascript:alert(1)//").is_err());
    }

    #[test]
    fn status_reports_file_cache() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        let clock = MockClock::new(1_000_000);
        let cache = AuthCache::with_clock(&store, clock.clone());

        assert_eq!(status(&cache), "Not authenticated\n");

        cache.store(NewAuthCache::new("tok", "alice"));
        clock.advance_ms(65_000);
        assert_eq!(
            status(&cache),
            "Logged in as alice\nToken type: bearer\nExpires in: 28m 55s\n"
        );

        cache.clear();
        assert_eq!(status(&cache), "Not authenticated\n");
    }
}
