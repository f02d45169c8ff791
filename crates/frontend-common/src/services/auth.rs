//! Authentication API service

use async_trait::async_trait;
use concierge_http::{
    AuthApiClient, ClientError, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse,
};

/// Calls the flows make against the authentication API
///
/// Futures are not required to be `Send` so that the browser client can
/// implement the trait.
#[async_trait(?Send)]
pub trait AuthApi {
    /// Exchange credentials for a token
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ClientError>;

    /// Create a resident account
    async fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse, ClientError>;
}

#[async_trait(?Send)]
impl AuthApi for AuthApiClient {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ClientError> {
        AuthApiClient::login(self, request).await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse, ClientError> {
        AuthApiClient::register(self, request).await
    }
}
