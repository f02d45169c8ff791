//! Registration page

use crate::app::Route;
use crate::components::{LoadingSpinner, NoticeBanner, PasswordMeter, TextField};
use crate::hooks::use_auth_flow;
use crate::pages::login::with_callback;
use concierge_frontend_common::{Field, FlowState, RegistrationForm};
use yew::prelude::*;

#[function_component(RegisterPage)]
pub fn register_page() -> Html {
    let flow = use_auth_flow(false);
    let form = use_state(RegistrationForm::default);
    let busy = flow.state.is_busy();

    let on_change = {
        let form = form.clone();
        let flow = flow.clone();
        Callback::from(move |(field, value): (Field, String)| {
            let mut next = (*form).clone();
            match field {
                Field::Name => next.name = value,
                Field::Username => next.username = value,
                Field::Email => next.email = value,
                Field::Password => next.password = value,
                Field::PhoneNumber => next.phone_number = value,
                Field::FlatNumber => next.flat_number = value,
                Field::BuildingName => next.building_name = value,
            }
            flow.clear_error(field);
            form.set(next);
        })
    };

    // Start over once the account exists
    {
        let form = form.clone();
        use_effect_with(*flow.state, move |state| {
            if *state == FlowState::Redirecting {
                form.set(RegistrationForm::default());
            }
        });
    }

    let onsubmit = {
        let form = form.clone();
        let flow = flow.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            flow.submit_registration((*form).clone());
        })
    };

    let field = |field: Field, label: &'static str, value: &str, input_type: &'static str| {
        html! {
            <TextField
                {field}
                {label}
                value={value.to_string()}
                {input_type}
                error={flow.errors.get(field)}
                disabled={busy}
                on_change={on_change.clone()}
            />
        }
    };

    let login_href = with_callback(&Route::Login, &flow.entry.raw_callback);

    html! {
        <div class="min-h-screen bg-gray-50 flex items-center justify-center px-4 py-8">
            <div class="max-w-md w-full bg-white rounded-lg shadow-lg p-8">
                <h1 class="text-2xl font-bold text-blue-700 mb-6 text-center">{"Resident Registration"}</h1>
                <NoticeBanner notice={(*flow.notice).clone()} />
                <form {onsubmit} novalidate={true}>
                    { field(Field::Name, "Full name", &form.name, "text") }
                    { field(Field::Username, "Username", &form.username, "text") }
                    { field(Field::Email, "Email", &form.email, "email") }
                    { field(Field::Password, "Password", &form.password, "password") }
                    <PasswordMeter password={form.password.clone()} />
                    { field(Field::PhoneNumber, "Phone number", &form.phone_number, "tel") }
                    { field(Field::FlatNumber, "Flat number", &form.flat_number, "text") }
                    { field(Field::BuildingName, "Building name", &form.building_name, "text") }
                    <button
                        type="submit"
                        disabled={busy}
                        class="w-full rounded-md bg-blue-600 px-4 py-2 font-medium text-white hover:bg-blue-700 disabled:opacity-50"
                    >
                        {"Register"}
                    </button>
                </form>
                if busy {
                    <LoadingSpinner text={Some("Please wait...".to_string())} />
                }
                <p class="mt-6 text-center text-sm text-gray-600">
                    {"Already registered? "}
                    <a href={login_href} class="text-blue-600 hover:underline">{"Log in"}</a>
                </p>
            </div>
        </div>
    }
}
