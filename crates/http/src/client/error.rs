//! Auth API client errors
//!
//! The login and registration endpoints answer domain failures (wrong
//! password, taken email) with a JSON envelope, which the client returns as a
//! response. A `ClientError` only covers what is left: the request never got
//! an answer, or the answer was not an envelope.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The Auth API could not be reached or the connection dropped
    #[error("Auth API request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Non-envelope reply with a status not covered by a dedicated variant
    #[error("Auth API returned {status}: {message}")]
    ServerError { status: u16, message: String },

    /// 401 without an envelope, e.g. from a gateway in front of the API
    #[error("Credentials rejected: {0}")]
    AuthenticationFailed(String),

    /// 404, usually a wrong `api_base_url`
    #[error("Auth endpoint not found: {0}")]
    NotFound(String),

    /// 400 without an envelope
    #[error("Malformed auth request: {0}")]
    BadRequest(String),

    /// 403 without an envelope
    #[error("Auth request forbidden: {0}")]
    Forbidden(String),

    /// 409 without an envelope; the account already exists
    #[error("Account conflict: {0}")]
    Conflict(String),

    /// A 2xx body that is not a login or registration envelope
    #[error("Unexpected Auth API response: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The client was built without a usable base URL
    #[error("Invalid client configuration: {0}")]
    Configuration(String),
}

impl ClientError {
    /// Map a non-envelope reply onto an error; `message` is the raw body
    #[must_use]
    pub fn from_status(status: reqwest::StatusCode, message: String) -> Self {
        match status.as_u16() {
            400 => Self::BadRequest(message),
            401 => Self::AuthenticationFailed(message),
            403 => Self::Forbidden(message),
            404 => Self::NotFound(message),
            409 => Self::Conflict(message),
            _ => Self::ServerError {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// HTTP status behind the error, if the API answered at all
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::BadRequest(_) => Some(400),
            Self::AuthenticationFailed(_) => Some(401),
            Self::Forbidden(_) => Some(403),
            Self::NotFound(_) => Some(404),
            Self::Conflict(_) => Some(409),
            Self::ServerError { status, .. } => Some(*status),
            Self::Request(_) | Self::Serialization(_) | Self::Configuration(_) => None,
        }
    }

    /// Whether the request never produced a usable response
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Request(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn status_round_trips_through_from_status() {
        for code in [400, 401, 403, 404, 409, 502] {
            let status = StatusCode::from_u16(code).unwrap();
            let error = ClientError::from_status(status, "body".to_string());
            assert_eq!(error.status(), Some(code));
            assert!(!error.is_transport());
        }
    }

    #[test]
    fn conflict_names_the_account() {
        let error = ClientError::from_status(StatusCode::CONFLICT, "taken".to_string());
        assert!(matches!(error, ClientError::Conflict(_)));
        assert_eq!(error.to_string(), "Account conflict: taken");
        assert_eq!(ClientError::Configuration("x".to_string()).status(), None);
    }
}
