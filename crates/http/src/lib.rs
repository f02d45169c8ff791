//! Concierge HTTP client
//!
//! Typed access to the remote authentication API (`/login`, `/register`).
//! Shared by the browser front-end and the CLI.

pub mod client;
pub mod types;

pub use client::{AuthApiClient, AuthApiClientBuilder, error::ClientError};
pub use types::{
    ApiStatus, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse,
};
