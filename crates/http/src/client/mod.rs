//! Concierge authentication API client

pub mod auth;
pub mod error;

use error::ClientError;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;
use tracing::debug;

/// Authentication API client
#[derive(Clone, Debug)]
pub struct AuthApiClient {
    client: Client,
    base_url: String,
}

impl AuthApiClient {
    /// Create a new client with default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::builder().base_url(base_url).build()
    }

    /// Create a new client builder
    #[must_use]
    pub fn builder() -> AuthApiClientBuilder {
        AuthApiClientBuilder::default()
    }

    /// Get the base URL
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Create a request builder for `path` relative to the base URL
    pub fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client.request(method, url)
    }

    /// Execute a request and decode the API envelope
    ///
    /// The API reports domain failures (bad credentials, duplicate accounts)
    /// inside a JSON envelope, sometimes with a non-2xx status. A body that
    /// decodes as `T` is therefore returned whatever the status; anything else
    /// is mapped from the HTTP status.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, on a 2xx body that does not
    /// decode, or on a non-2xx status without an envelope
    pub async fn execute<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!(status = status.as_u16(), bytes = body.len(), "Auth API response");

        match serde_json::from_str::<T>(&body) {
            Ok(envelope) => Ok(envelope),
            Err(e) if status.is_success() => Err(ClientError::Serialization(e)),
            Err(_) => {
                let message = if body.is_empty() {
                    status.to_string()
                } else {
                    body
                };
                Err(ClientError::from_status(status, message))
            }
        }
    }
}

/// Builder for AuthApiClient
#[derive(Default)]
pub struct AuthApiClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl AuthApiClientBuilder {
    /// Set the base URL
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout (ignored on WASM, where the browser owns it)
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent (native only)
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the client
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Configuration`] without a base URL, or the
    /// underlying error if the HTTP client cannot be built
    pub fn build(self) -> Result<AuthApiClient, ClientError> {
        let base_url = self
            .base_url
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| ClientError::Configuration("base_url is required".into()))?;

        // Ensure base_url ends without a trailing slash
        let base_url = base_url.trim_end_matches('/').to_string();

        #[cfg(not(target_arch = "wasm32"))]
        let client = {
            let mut builder = ClientBuilder::new().user_agent(
                self.user_agent
                    .unwrap_or_else(|| format!("concierge-client/{}", env!("CARGO_PKG_VERSION"))),
            );
            if let Some(timeout) = self.timeout {
                builder = builder.timeout(timeout);
            }
            builder.build()?
        };

        #[cfg(target_arch = "wasm32")]
        let client = {
            let _ = (self.timeout, self.user_agent); // Browser controls both
            ClientBuilder::new().build()?
        };

        Ok(AuthApiClient { client, base_url })
    }
}
