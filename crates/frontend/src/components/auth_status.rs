//! Banner describing the cached login, with a logout button

use concierge_core::AuthCacheRecord;
use yew::prelude::*;

/// `12m 5s` style rendering of a number of seconds
pub fn format_remaining(seconds: u64) -> String {
    format!("{}m {}s", seconds / 60, seconds % 60)
}

#[derive(Properties, Clone, PartialEq)]
pub struct AuthStatusProps {
    pub record: Option<AuthCacheRecord>,
    pub remaining_secs: u64,
    pub on_logout: Callback<()>,
}

#[function_component(AuthStatus)]
pub fn auth_status(props: &AuthStatusProps) -> Html {
    let Some(record) = &props.record else {
        return html! {};
    };

    let onclick = {
        let on_logout = props.on_logout.clone();
        Callback::from(move |_: MouseEvent| on_logout.emit(()))
    };

    html! {
        <div class="bg-green-100 border border-green-400 text-green-700 px-4 py-3 rounded shadow mb-6">
            <div class="flex justify-between items-center">
                <div>
                    <p class="font-semibold">{format!("Already logged in as: {}", record.username)}</p>
                    <p class="text-sm">{format!("Expires in: {}", format_remaining(props.remaining_secs))}</p>
                </div>
                <button {onclick} class="ml-4 bg-red-500 hover:bg-red-600 text-white px-3 py-1 rounded text-sm">
                    {"Logout"}
                </button>
            </div>
        </div>
    }
}
