//! Request and response bodies of the authentication API

use concierge_core::UserSummary;
use serde::{Deserialize, Serialize};
use std::fmt;

/// `status` field of every API envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiStatus {
    Success,
    Error,
    /// Any value this client does not know about
    #[serde(other)]
    Unknown,
}

/// Login request
#[derive(Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Username or email
    pub identifier: String,
    pub password: String,
}

impl LoginRequest {
    /// Create a login request
    pub fn new(identifier: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("identifier", &self.identifier)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Login response envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub code: u16,
    pub status: ApiStatus,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    /// Token validity in seconds
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub message: Option<String>,
}

impl LoginResponse {
    /// `200` with a success status
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.code == 200 && self.status == ApiStatus::Success
    }

    /// `401` with an error status
    #[must_use]
    pub fn is_invalid_credentials(&self) -> bool {
        self.code == 401 && self.status == ApiStatus::Error
    }
}

/// Registration request, as the API names the fields
#[derive(Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub password: String,
    pub building_name: String,
    pub apartment_name: String,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("full_name", &self.full_name)
            .field("email", &self.email)
            .field("phone_number", &self.phone_number)
            .field("password", &"<redacted>")
            .field("building_name", &self.building_name)
            .field("apartment_name", &self.apartment_name)
            .finish()
    }
}

/// Registration response envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub code: u16,
    pub status: ApiStatus,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user: Option<UserSummary>,
}

impl RegisterResponse {
    /// `201` with a success status
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.code == 201 && self.status == ApiStatus::Success
    }

    /// `409` with an error status (account already exists)
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        self.code == 409 && self.status == ApiStatus::Error
    }
}
