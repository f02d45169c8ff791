//! Login page

use crate::app::Route;
use crate::components::{LoadingSpinner, NoticeBanner, TextField};
use crate::hooks::use_auth_flow;
use concierge_frontend_common::{AuthConfig, Field, LoginForm};
use url::form_urlencoded;
use yew::prelude::*;
use yew_router::Routable;

/// Link to `route` that keeps the callback of the current page
pub fn with_callback(route: &Route, callback: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair(AuthConfig::CALLBACK_PARAM, callback)
        .finish();
    format!("{}?{query}", route.to_path())
}

#[function_component(LoginPage)]
pub fn login_page() -> Html {
    let flow = use_auth_flow(true);
    let form = use_state(LoginForm::default);
    let busy = flow.state.is_busy();

    let on_change = {
        let form = form.clone();
        let flow = flow.clone();
        Callback::from(move |(field, value): (Field, String)| {
            let mut next = (*form).clone();
            match field {
                Field::Username => next.username = value,
                Field::Password => next.password = value,
                _ => return,
            }
            flow.clear_error(field);
            form.set(next);
        })
    };

    let onsubmit = {
        let form = form.clone();
        let flow = flow.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            flow.submit_login((*form).clone());
        })
    };

    let register_href = with_callback(&Route::Register, &flow.entry.raw_callback);

    html! {
        <div class="min-h-screen bg-gray-50 flex items-center justify-center px-4">
            <div class="max-w-md w-full bg-white rounded-lg shadow-lg p-8">
                <h1 class="text-2xl font-bold text-blue-700 mb-6 text-center">{"Resident Login"}</h1>
                <NoticeBanner notice={(*flow.notice).clone()} />
                <form {onsubmit} novalidate={true}>
                    <TextField
                        field={Field::Username}
                        label="Username or email"
                        value={form.username.clone()}
                        error={flow.errors.get(Field::Username)}
                        disabled={busy}
                        on_change={on_change.clone()}
                    />
                    <TextField
                        field={Field::Password}
                        label="Password"
                        input_type="password"
                        value={form.password.clone()}
                        error={flow.errors.get(Field::Password)}
                        disabled={busy}
                        {on_change}
                    />
                    <button
                        type="submit"
                        disabled={busy}
                        class="w-full rounded-md bg-blue-600 px-4 py-2 font-medium text-white hover:bg-blue-700 disabled:opacity-50"
                    >
                        {"Login"}
                    </button>
                </form>
                if busy {
                    <LoadingSpinner text={Some("Please wait...".to_string())} />
                }
                <p class="mt-6 text-center text-sm text-gray-600">
                    {"New resident? "}
                    <a href={register_href} class="text-blue-600 hover:underline">{"Create an account"}</a>
                </p>
            </div>
        </div>
    }
}
