//! Authentication endpoints

use super::{AuthApiClient, error::ClientError};
use crate::types::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use reqwest::Method;
use tracing::debug;

impl AuthApiClient {
    /// Exchange credentials for a token
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or when the response is not an
    /// API envelope
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ClientError> {
        debug!(identifier = %request.identifier, "POST /login");
        let req = self.request(Method::POST, "/login").json(request);
        self.execute(req).await
    }

    /// Create a resident account
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or when the response is not an
    /// API envelope
    pub async fn register(
        &self,
        request: &RegisterRequest,
    ) -> Result<RegisterResponse, ClientError> {
        debug!(email = %request.email, "POST /register");
        let req = self.request(Method::POST, "/register").json(request);
        self.execute(req).await
    }
}
