//! Test harness for CacheStore implementations
//!
//! This module provides a test suite that can be used to verify any
//! implementation of the CacheStore trait. Front-ends that bring their own
//! storage backend can run it to check they behave like the built-in stores.

use crate::{AuthCache, CacheStore, MockClock, NewAuthCache, StoreError};

/// Test suite for CacheStore implementations
pub struct CacheStoreTestSuite<S: CacheStore> {
    store: S,
}

impl<S: CacheStore> CacheStoreTestSuite<S> {
    /// Create a new test suite with the given store
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Run all tests
    ///
    /// # Errors
    ///
    /// Returns the first storage error raised by the store under test
    pub fn run_all_tests(self) -> Result<(), StoreError> {
        self.test_basic_operations()?;
        self.test_overwrite()?;
        self.test_remove_missing_key()?;
        self.test_auth_cache_roundtrip()?;
        Ok(())
    }

    /// Set, get and remove a single key
    ///
    /// # Errors
    ///
    /// Returns any storage error raised by the store
    pub fn test_basic_operations(&self) -> Result<(), StoreError> {
        assert_eq!(self.store.get("suite_basic")?, None);

        self.store.set("suite_basic", "value")?;
        assert_eq!(self.store.get("suite_basic")?.as_deref(), Some("value"));

        self.store.remove("suite_basic")?;
        assert_eq!(self.store.get("suite_basic")?, None, "key should be gone");
        Ok(())
    }

    /// A second write replaces the first
    ///
    /// # Errors
    ///
    /// Returns any storage error raised by the store
    pub fn test_overwrite(&self) -> Result<(), StoreError> {
        self.store.set("suite_overwrite", "first")?;
        self.store.set("suite_overwrite", "second")?;
        assert_eq!(
            self.store.get("suite_overwrite")?.as_deref(),
            Some("second")
        );
        self.store.remove("suite_overwrite")
    }

    /// Removing a key that was never written succeeds
    ///
    /// # Errors
    ///
    /// Returns any storage error raised by the store
    pub fn test_remove_missing_key(&self) -> Result<(), StoreError> {
        self.store.remove("suite_never_written")
    }

    /// The auth cache works end to end on top of the store
    ///
    /// # Errors
    ///
    /// Returns any storage error raised by the store
    pub fn test_auth_cache_roundtrip(&self) -> Result<(), StoreError> {
        let clock = MockClock::new(1_642_780_800_000);
        let cache = AuthCache::with_clock(&self.store, clock.clone()).with_key("suite_auth");

        let stored = cache.store(NewAuthCache::new("suite-token", "resident@example.com"));
        assert_eq!(cache.fetch(), Some(stored));
        assert!(self.store.get("suite_auth")?.is_some());

        clock.advance_ms(1_800_001);
        assert_eq!(cache.fetch(), None);
        assert_eq!(
            self.store.get("suite_auth")?,
            None,
            "expired record should be deleted on read"
        );
        Ok(())
    }
}
