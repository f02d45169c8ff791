//! Local "already authenticated" cache
//!
//! A single [`AuthCacheRecord`] lives in a [`CacheStore`] under a fixed key.
//! Expiry is enforced lazily: every read checks the record against the clock
//! and deletes it when it is stale or unreadable. Storage failures never reach
//! the caller, they are logged and the cache behaves as if empty.

use crate::clock::{Clock, SystemClock};
use crate::store::CacheStore;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Storage key holding the serialized record
pub const AUTH_CACHE_KEY: &str = "auth_cache";

/// Token scheme used when the API does not name one
pub const DEFAULT_TOKEN_TYPE: &str = "bearer";

/// Validity used when the API does not send `expires_in` (30 minutes)
pub const DEFAULT_EXPIRES_IN_SECS: u64 = 1800;

/// Locally persisted proof of a prior successful login
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthCacheRecord {
    pub token: String,
    pub token_type: String,
    /// Validity in seconds, counted from `timestamp`
    pub expires_in: u64,
    /// Creation time in milliseconds since the UNIX epoch
    pub timestamp: i64,
    pub username: String,
}

impl AuthCacheRecord {
    /// Expiry instant in milliseconds since the UNIX epoch
    #[must_use]
    pub fn expires_at_ms(&self) -> i64 {
        let validity_ms = i64::try_from(self.expires_in)
            .unwrap_or(i64::MAX)
            .saturating_mul(1000);
        self.timestamp.saturating_add(validity_ms)
    }

    /// A record is still valid at the exact expiry millisecond
    #[must_use]
    pub fn is_valid_at(&self, now_ms: i64) -> bool {
        now_ms <= self.expires_at_ms()
    }

    /// Whole seconds left before expiry, never negative
    #[must_use]
    pub fn remaining_seconds_at(&self, now_ms: i64) -> u64 {
        let remaining_ms = self.expires_at_ms().saturating_sub(now_ms).max(0);
        u64::try_from(remaining_ms / 1000).unwrap_or(0)
    }
}

/// Data handed to [`AuthCache::store`] after a successful login
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NewAuthCache {
    pub token: String,
    pub token_type: Option<String>,
    pub expires_in: Option<u64>,
    pub username: String,
}

impl NewAuthCache {
    /// Create cache input with the default token type and validity
    pub fn new(token: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            username: username.into(),
            ..Self::default()
        }
    }

    /// Set the token scheme
    #[must_use]
    pub fn token_type(mut self, token_type: impl Into<String>) -> Self {
        self.token_type = Some(token_type.into());
        self
    }

    /// Set the validity in seconds
    #[must_use]
    pub const fn expires_in(mut self, expires_in: u64) -> Self {
        self.expires_in = Some(expires_in);
        self
    }

    /// Apply defaults and stamp the creation time
    ///
    /// An empty token type or a zero validity count as missing.
    #[must_use]
    pub fn normalize(self, now_ms: i64) -> AuthCacheRecord {
        AuthCacheRecord {
            token: self.token,
            token_type: self
                .token_type
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| DEFAULT_TOKEN_TYPE.to_string()),
            expires_in: self
                .expires_in
                .filter(|secs| *secs > 0)
                .unwrap_or(DEFAULT_EXPIRES_IN_SECS),
            timestamp: now_ms,
            username: self.username,
        }
    }
}

/// Owner of the authentication record's lifecycle
#[derive(Debug, Clone)]
pub struct AuthCache<S, C = SystemClock> {
    backend: S,
    clock: C,
    key: String,
}

impl<S: CacheStore> AuthCache<S> {
    /// Create a cache over `backend` using the system clock
    pub fn new(backend: S) -> Self {
        Self::with_clock(backend, SystemClock)
    }
}

impl<S: CacheStore, C: Clock> AuthCache<S, C> {
    /// Create a cache with an explicit clock
    pub fn with_clock(backend: S, clock: C) -> Self {
        Self {
            backend,
            clock,
            key: AUTH_CACHE_KEY.to_string(),
        }
    }

    /// Use a different storage key
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Storage key of the record
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Clock used for expiry checks
    pub const fn clock(&self) -> &C {
        &self.clock
    }

    /// Underlying store
    pub const fn backend(&self) -> &S {
        &self.backend
    }

    /// Persist a normalized record, replacing any previous one
    ///
    /// Returns the record as it was written. A storage failure is logged and
    /// swallowed; the returned record is then only held by the caller.
    pub fn store(&self, data: NewAuthCache) -> AuthCacheRecord {
        let record = data.normalize(self.clock.now_ms());

        match serde_json::to_string(&record) {
            Ok(serialized) => {
                if let Err(e) = self.backend.set(&self.key, &serialized) {
                    warn!(key = %self.key, error = %e, "Failed to store auth cache");
                } else {
                    debug!(key = %self.key, username = %record.username, "Stored auth cache");
                }
            }
            Err(e) => warn!(key = %self.key, error = %e, "Failed to serialize auth cache"),
        }

        record
    }

    /// Read the record if it exists and is still valid
    ///
    /// Stale and corrupted entries are deleted as a side effect.
    pub fn fetch(&self) -> Option<AuthCacheRecord> {
        let raw = match self.backend.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to retrieve auth cache");
                self.clear();
                return None;
            }
        };

        let record: AuthCacheRecord = match serde_json::from_str(&raw) {
            Ok(record) => record,
            Err(e) => {
                warn!(key = %self.key, error = %e, "Discarding corrupted auth cache");
                self.clear();
                return None;
            }
        };

        let now = self.clock.now_ms();
        if !record.is_valid_at(now) {
            debug!(
                key = %self.key,
                expired_at = record.expires_at_ms(),
                now,
                "Auth cache expired"
            );
            self.clear();
            return None;
        }

        Some(record)
    }

    /// Whether a valid record exists
    pub fn is_authenticated(&self) -> bool {
        self.fetch().is_some()
    }

    /// Delete the record; failures are logged and swallowed
    pub fn clear(&self) {
        if let Err(e) = self.backend.remove(&self.key) {
            warn!(key = %self.key, error = %e, "Failed to clear auth cache");
        }
    }

    /// Whole seconds before the record expires, `0` when there is none
    pub fn remaining_seconds(&self) -> u64 {
        self.fetch()
            .map_or(0, |record| record.remaining_seconds_at(self.clock.now_ms()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::MockClock;
    use crate::store::{MemoryStore, StoreError};
    use std::sync::Arc;

    const T0: i64 = 1_642_780_800_000;

    fn cache() -> (AuthCache<Arc<MemoryStore>, MockClock>, Arc<MemoryStore>, MockClock) {
        let store = Arc::new(MemoryStore::new());
        let clock = MockClock::new(T0);
        let cache = AuthCache::with_clock(Arc::clone(&store), clock.clone());
        (cache, store, clock)
    }

    fn seed(store: &MemoryStore, timestamp: i64, expires_in: u64) {
        let record = AuthCacheRecord {
            token: "seeded".to_string(),
            token_type: "bearer".to_string(),
            expires_in,
            timestamp,
            username: "resident".to_string(),
        };
        store
            .set(AUTH_CACHE_KEY, &serde_json::to_string(&record).unwrap())
            .unwrap();
    }

    /// Store whose every operation fails
    struct BrokenStore;

    impl CacheStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Denied("blocked".to_string()))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Denied("quota exceeded".to_string()))
        }

        fn remove(&self, _key: &str) -> Result<(), StoreError> {
            Err(StoreError::Denied("blocked".to_string()))
        }
    }

    #[test]
    fn store_then_fetch_returns_normalized_record() {
        let (cache, _, _) = cache();

        let written = cache.store(NewAuthCache::new("tok", "alice@example.com"));
        let expected = AuthCacheRecord {
            token: "tok".to_string(),
            token_type: "bearer".to_string(),
            expires_in: 1800,
            timestamp: T0,
            username: "alice@example.com".to_string(),
        };

        assert_eq!(written, expected);
        assert_eq!(cache.fetch(), Some(expected));
    }

    #[test]
    fn store_keeps_explicit_values() {
        let (cache, _, _) = cache();

        cache.store(
            NewAuthCache::new("tok", "bob")
                .token_type("mac")
                .expires_in(60),
        );
        let record = cache.fetch().unwrap();

        assert_eq!(record.token_type, "mac");
        assert_eq!(record.expires_in, 60);
    }

    #[test]
    fn empty_token_type_and_zero_validity_fall_back_to_defaults() {
        let record = NewAuthCache::new("tok", "bob")
            .token_type("")
            .expires_in(0)
            .normalize(T0);

        assert_eq!(record.token_type, DEFAULT_TOKEN_TYPE);
        assert_eq!(record.expires_in, DEFAULT_EXPIRES_IN_SECS);
    }

    #[test]
    fn store_overwrites_previous_record() {
        let (cache, store, clock) = cache();

        cache.store(NewAuthCache::new("first", "a"));
        clock.advance_ms(5_000);
        cache.store(NewAuthCache::new("second", "b"));

        let record = cache.fetch().unwrap();
        assert_eq!(record.token, "second");
        assert_eq!(record.timestamp, T0 + 5_000);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn record_valid_after_fifteen_minutes() {
        let (cache, store, clock) = cache();
        seed(&store, T0, 1800);

        clock.set_ms(T0 + 900_000);
        assert!(cache.is_authenticated());
        assert!(store.get(AUTH_CACHE_KEY).unwrap().is_some());
    }

    #[test]
    fn record_expired_after_thirty_three_minutes_is_deleted() {
        let (cache, store, clock) = cache();
        seed(&store, T0, 1800);

        clock.set_ms(T0 + 2_000_000);
        assert_eq!(cache.fetch(), None);
        assert_eq!(store.get(AUTH_CACHE_KEY).unwrap(), None);
    }

    #[test]
    fn record_valid_at_exact_expiry() {
        let (cache, store, clock) = cache();
        seed(&store, T0, 1800);

        clock.set_ms(T0 + 1_800_000);
        assert!(cache.is_authenticated());
        assert_eq!(cache.remaining_seconds(), 0);

        clock.advance_ms(1);
        assert!(!cache.is_authenticated());
    }

    #[test]
    fn corrupted_payload_is_discarded() {
        let (cache, store, _) = cache();
        store.set(AUTH_CACHE_KEY, "not json {").unwrap();

        assert_eq!(cache.fetch(), None);
        assert_eq!(store.get(AUTH_CACHE_KEY).unwrap(), None);
    }

    #[test]
    fn payload_missing_fields_is_discarded() {
        let (cache, store, _) = cache();
        store.set(AUTH_CACHE_KEY, r#"{"token":"abc"}"#).unwrap();

        assert!(!cache.is_authenticated());
        assert!(store.is_empty());
    }

    #[test]
    fn remaining_seconds_counts_down_to_zero() {
        let (cache, _, clock) = cache();
        cache.store(NewAuthCache::new("tok", "alice").expires_in(10));

        assert_eq!(cache.remaining_seconds(), 10);

        let mut previous = cache.remaining_seconds();
        for _ in 0..10 {
            clock.advance_ms(1_000);
            let current = cache.remaining_seconds();
            assert!(current < previous, "{current} should be below {previous}");
            previous = current;
        }
        assert_eq!(previous, 0);

        clock.advance_ms(60_000);
        assert_eq!(cache.remaining_seconds(), 0);
    }

    #[test]
    fn remaining_seconds_floors_partial_seconds() {
        let (cache, _, clock) = cache();
        cache.store(NewAuthCache::new("tok", "alice"));

        clock.advance_ms(1_500);
        assert_eq!(cache.remaining_seconds(), 1798);
    }

    #[test]
    fn remaining_seconds_without_record_is_zero() {
        let (cache, _, _) = cache();
        assert_eq!(cache.remaining_seconds(), 0);
    }

    #[test]
    fn clear_removes_record() {
        let (cache, store, _) = cache();
        cache.store(NewAuthCache::new("tok", "alice"));

        cache.clear();
        assert!(!cache.is_authenticated());
        assert!(store.is_empty());

        // Clearing twice is harmless
        cache.clear();
    }

    #[test]
    fn custom_key_isolates_records() {
        let store = Arc::new(MemoryStore::new());
        let clock = MockClock::new(T0);
        let tenant = AuthCache::with_clock(Arc::clone(&store), clock.clone()).with_key("tenant_a");
        let default = AuthCache::with_clock(Arc::clone(&store), clock);

        tenant.store(NewAuthCache::new("tok", "alice"));
        assert_eq!(tenant.key(), "tenant_a");
        assert!(tenant.is_authenticated());
        assert!(!default.is_authenticated());
    }

    #[test]
    fn storage_failures_are_swallowed() {
        let cache = AuthCache::with_clock(BrokenStore, MockClock::new(T0));

        let record = cache.store(NewAuthCache::new("tok", "alice"));
        assert_eq!(record.token, "tok");
        assert_eq!(cache.fetch(), None);
        assert!(!cache.is_authenticated());
        assert_eq!(cache.remaining_seconds(), 0);
        cache.clear();
    }
}
