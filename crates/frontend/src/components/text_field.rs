//! Labelled input with an inline validation message

use concierge_frontend_common::Field;
use yew::prelude::*;

#[derive(Properties, Clone, PartialEq)]
pub struct TextFieldProps {
    pub field: Field,
    pub label: AttrValue,
    pub value: AttrValue,
    #[prop_or(AttrValue::Static("text"))]
    pub input_type: AttrValue,
    #[prop_or_default]
    pub error: Option<&'static str>,
    #[prop_or_default]
    pub disabled: bool,
    pub on_change: Callback<(Field, String)>,
}

#[function_component(TextField)]
pub fn text_field(props: &TextFieldProps) -> Html {
    let oninput = {
        let field = props.field;
        let on_change = props.on_change.clone();
        Callback::from(move |e: InputEvent| {
            let input: web_sys::HtmlInputElement = e.target_unchecked_into();
            on_change.emit((field, input.value()));
        })
    };

    let border = if props.error.is_some() {
        "border-red-600"
    } else {
        "border-blue-600"
    };

    html! {
        <div class="mb-4">
            <label for={props.field.as_str()} class="block text-sm font-medium text-gray-700 mb-1">
                {&props.label}
            </label>
            <input
                id={props.field.as_str()}
                name={props.field.as_str()}
                type={props.input_type.clone()}
                value={props.value.clone()}
                disabled={props.disabled}
                {oninput}
                class={classes!("w-full", "rounded-md", "border", "px-3", "py-2", border)}
            />
            if let Some(error) = props.error {
                <p class="mt-1 text-sm text-red-600">{error}</p>
            }
        </div>
    }
}
