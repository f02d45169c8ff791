//! Concierge core types and utilities
//!
//! Everything in this crate is platform independent: the browser front-end,
//! the CLI and the tests all share the same cache and callback semantics.

pub mod cache;
pub mod callback;
pub mod clock;
pub mod config;
pub mod store;

#[cfg(any(test, feature = "tests"))]
pub mod tests;

pub use cache::{AUTH_CACHE_KEY, AuthCache, AuthCacheRecord, NewAuthCache};
pub use callback::{
    AuthCallbackParams, AuthMethod, AuthStatus, CallbackError, CallbackPayload, UserSummary,
    build_url, parse_url, resolve_callback,
};
pub use clock::{Clock, MockClock, SystemClock};
pub use config::AuthSettings;
pub use store::{CacheStore, MemoryStore, StoreError};

#[cfg(not(target_arch = "wasm32"))]
pub use store::FileStore;
