pub mod use_auth_flow;

pub use use_auth_flow::{Notice, UseAuthFlowHandle, use_auth_flow};
