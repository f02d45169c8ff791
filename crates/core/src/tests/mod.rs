//! Shared test harnesses

mod store;

pub use store::CacheStoreTestSuite;
