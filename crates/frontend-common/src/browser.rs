//! Browser bindings: `localStorage`, the current location and navigation

use crate::config::AuthConfig;
use crate::flow::PendingRedirect;
use concierge_core::{CacheStore, StoreError};
use gloo::timers::callback::Timeout;
use tracing::{info, warn};
use url::Url;
use web_sys::{Storage, UrlSearchParams};

/// Get localStorage
fn get_local_storage() -> Option<Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

fn js_error(e: &wasm_bindgen::JsValue) -> String {
    e.as_string().unwrap_or_else(|| format!("{e:?}"))
}

/// [`CacheStore`] backed by the page's `localStorage`
///
/// Private browsing modes may deny access; every call then fails with a
/// [`StoreError`] that the auth cache logs and ignores.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageStore;

impl LocalStorageStore {
    fn storage() -> Result<Storage, StoreError> {
        get_local_storage()
            .ok_or_else(|| StoreError::Unavailable("localStorage is not available".into()))
    }
}

impl CacheStore for LocalStorageStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Self::storage()?
            .get_item(key)
            .map_err(|e| StoreError::Denied(js_error(&e)))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|e| StoreError::Denied(js_error(&e)))
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        Self::storage()?
            .remove_item(key)
            .map_err(|e| StoreError::Denied(js_error(&e)))
    }
}

/// Origin of the current page, used to resolve relative callbacks
#[must_use]
pub fn page_origin() -> Option<Url> {
    let origin = web_sys::window()?.location().origin().ok()?;
    Url::parse(&origin).ok()
}

/// Read a query parameter of the current page
#[must_use]
pub fn query_param(name: &str) -> Option<String> {
    let search = web_sys::window()?.location().search().ok()?;
    UrlSearchParams::new_with_str(&search).ok()?.get(name)
}

/// `callback` and `force` query parameters of the current page
#[must_use]
pub fn entry_params() -> (String, bool) {
    let callback = query_param(AuthConfig::CALLBACK_PARAM)
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| AuthConfig::DEFAULT_CALLBACK.to_string());
    let force = AuthConfig::is_forced(query_param(AuthConfig::FORCE_PARAM).as_deref());
    (callback, force)
}

/// Leave the application for `url`
pub fn navigate(url: &str) {
    let Some(window) = web_sys::window() else {
        warn!("No window available for navigation");
        return;
    };
    if let Err(e) = window.location().set_href(url) {
        warn!(error = %js_error(&e), "Navigation failed");
    }
}

/// Navigate once the redirect's delay has elapsed
///
/// Dropping the returned handle cancels the navigation.
#[must_use]
pub fn schedule_redirect(redirect: &PendingRedirect) -> Timeout {
    info!(source = ?redirect.source, delay_ms = redirect.delay_ms(), "Scheduling redirect");
    let url = redirect.url.clone();
    Timeout::new(redirect.delay_ms(), move || navigate(&url))
}
