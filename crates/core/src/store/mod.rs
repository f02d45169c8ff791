//! Durable key-value storage for the authentication record

mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod file;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;
pub use memory::MemoryStore;

use std::rc::Rc;
use std::sync::Arc;
use thiserror::Error;

/// Storage error types
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing storage could not be reached (no window, poisoned lock, ...)
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// The backing storage refused the operation (quota, privacy mode, ...)
    #[error("Storage access denied: {0}")]
    Denied(String),

    /// Key contains characters the backend cannot represent
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    /// Filesystem error
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Whether `key` is usable by every store: non-empty ASCII letters, digits,
/// `_` or `-`
#[must_use]
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Synchronous string key-value store
///
/// Implementations must be durable for the lifetime the front-end needs
/// (page reloads in the browser, process restarts for the CLI). Reads and
/// writes are expected to be cheap and never block on the network.
pub trait CacheStore {
    /// Read the raw value stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete `key`; deleting a missing key is not an error
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

impl<S: CacheStore + ?Sized> CacheStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

impl<S: CacheStore + ?Sized> CacheStore for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

impl<S: CacheStore + ?Sized> CacheStore for Rc<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}
