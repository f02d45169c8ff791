//! Hook wiring an [`AuthFlow`] into a form page

use concierge_core::{AuthCache, resolve_callback};
use concierge_frontend_common::browser::{entry_params, page_origin, schedule_redirect};
use concierge_frontend_common::forms::messages;
use concierge_frontend_common::{
    AuthConfig, AuthFlow, FieldErrors, FlowOutcome, FlowState, LocalStorageStore, LoginForm,
    RegistrationForm,
};
use concierge_http::AuthApiClient;
use gloo::timers::callback::Timeout;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::warn;
use url::Url;
use yew::prelude::*;

type BrowserFlow = AuthFlow<AuthApiClient, LocalStorageStore>;

/// Page entry parameters
#[derive(Clone, Debug, PartialEq)]
pub struct Entry {
    /// Raw `callback` query value
    pub raw_callback: String,
    /// Resolved callback, `None` when it cannot be resolved
    pub callback: Option<Url>,
    pub force: bool,
}

impl Entry {
    fn from_location() -> Self {
        let (raw_callback, force) = entry_params();
        let origin = page_origin();
        let callback = match resolve_callback(&raw_callback, origin.as_ref()) {
            Ok(url) => Some(url),
            Err(e) => {
                warn!(callback = %raw_callback, error = %e, "Invalid callback URL");
                resolve_callback(AuthConfig::DEFAULT_CALLBACK, origin.as_ref()).ok()
            }
        };
        Self {
            raw_callback,
            callback,
            force,
        }
    }
}

/// Banner shown above a form
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub success: bool,
    pub text: String,
}

/// Handle returned by [`use_auth_flow`]
#[derive(Clone)]
pub struct UseAuthFlowHandle {
    pub entry: Rc<Entry>,
    pub state: UseStateHandle<FlowState>,
    pub errors: UseStateHandle<FieldErrors>,
    pub notice: UseStateHandle<Option<Notice>>,
    timer: Rc<RefCell<Option<Timeout>>>,
}

impl UseAuthFlowHandle {
    fn flow(&self) -> Option<BrowserFlow> {
        let callback = self.entry.callback.clone()?;
        let settings = AuthConfig::browser_settings();
        let api = match AuthApiClient::new(settings.api_base_url.clone()) {
            Ok(api) => api,
            Err(e) => {
                warn!(error = %e, "Failed to create auth API client");
                return None;
            }
        };
        let cache = AuthCache::new(LocalStorageStore).with_key(settings.cache_key.clone());
        Some(AuthFlow::new(api, cache, callback, &settings))
    }

    fn apply(&self, outcome: &FlowOutcome, state: FlowState) {
        self.state.set(state);
        match outcome {
            FlowOutcome::Invalid(errors) => self.errors.set(errors.clone()),
            _ => self.errors.set(FieldErrors::new()),
        }
        self.notice.set(outcome.message().map(|text| Notice {
            success: outcome.is_success(),
            text: text.to_string(),
        }));
        if let Some(redirect) = outcome.redirect() {
            *self.timer.borrow_mut() = Some(schedule_redirect(redirect));
        }
    }

    fn unavailable(&self, message: &str) {
        self.state.set(FlowState::Failed);
        self.notice.set(Some(Notice {
            success: false,
            text: message.to_string(),
        }));
    }

    /// Redirect straight away when a valid login is cached
    fn check_cached_login(&self) {
        let Some(mut flow) = self.flow() else {
            return;
        };
        if let Some(outcome) = flow.on_mount(self.entry.force) {
            self.apply(&outcome, flow.state());
        }
    }

    pub fn submit_login(&self, form: LoginForm) {
        let Some(mut flow) = self.flow() else {
            self.unavailable(messages::LOGIN_FAILED);
            return;
        };
        let handle = self.clone();
        self.state.set(FlowState::Submitting);

        wasm_bindgen_futures::spawn_local(async move {
            let outcome = flow.submit_login(&form).await;
            handle.apply(&outcome, flow.state());
        });
    }

    pub fn submit_registration(&self, form: RegistrationForm) {
        let Some(mut flow) = self.flow() else {
            self.unavailable(messages::REGISTER_FAILED);
            return;
        };
        let handle = self.clone();
        self.state.set(FlowState::Submitting);

        wasm_bindgen_futures::spawn_local(async move {
            let outcome = flow.submit_registration(&form).await;
            handle.apply(&outcome, flow.state());
        });
    }

    /// Clear the message of a field being edited
    ///
    /// A failure shown on the form is dismissed at the same time.
    pub fn clear_error(&self, field: concierge_frontend_common::Field) {
        if self.errors.get(field).is_some() {
            let mut errors = (*self.errors).clone();
            errors.clear(field);
            self.errors.set(errors);
        }
        let next = self.state.after_edit();
        if next != *self.state {
            self.state.set(next);
            if (*self.notice).as_ref().is_some_and(|notice| !notice.success) {
                self.notice.set(None);
            }
        }
    }
}

/// Drive a login or registration form
///
/// With `reuse_cached_login`, a valid cached login redirects on mount unless
/// the page was opened with `force=true`.
#[hook]
pub fn use_auth_flow(reuse_cached_login: bool) -> UseAuthFlowHandle {
    let entry = use_memo((), |()| Entry::from_location());
    let state = use_state(FlowState::default);
    let errors = use_state(FieldErrors::new);
    let notice = use_state(|| None::<Notice>);
    let timer = use_mut_ref(|| None::<Timeout>);

    let handle = UseAuthFlowHandle {
        entry,
        state,
        errors,
        notice,
        timer,
    };

    {
        let handle = handle.clone();
        use_effect_with((), move |()| {
            if reuse_cached_login {
                handle.check_cached_login();
            }
        });
    }

    handle
}
