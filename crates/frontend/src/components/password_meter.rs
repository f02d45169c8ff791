//! Password strength bar

use concierge_frontend_common::forms::MAX_PASSWORD_STRENGTH;
use concierge_frontend_common::password_strength;
use yew::prelude::*;

#[derive(Properties, Clone, PartialEq)]
pub struct PasswordMeterProps {
    pub password: AttrValue,
}

#[function_component(PasswordMeter)]
pub fn password_meter(props: &PasswordMeterProps) -> Html {
    let strength = password_strength(&props.password);
    let (label, color) = match strength {
        0..=2 => ("Weak", "bg-red-500"),
        3..=4 => ("Medium", "bg-yellow-500"),
        _ => ("Strong", "bg-green-500"),
    };

    html! {
        <div class="mb-4 -mt-2">
            <div class="flex gap-1">
                { for (1..=MAX_PASSWORD_STRENGTH).map(|step| {
                    let fill = if step <= strength { color } else { "bg-gray-200" };
                    html! { <div class={classes!("h-1", "flex-1", "rounded", fill)}></div> }
                }) }
            </div>
            if !props.password.is_empty() {
                <p class="mt-1 text-xs text-gray-600">{format!("Password strength: {label}")}</p>
            }
        </div>
    }
}
