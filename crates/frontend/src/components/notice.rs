//! Success and error banner

use crate::hooks::Notice;
use yew::prelude::*;

#[derive(Properties, Clone, PartialEq)]
pub struct NoticeBannerProps {
    pub notice: Option<Notice>,
}

#[function_component(NoticeBanner)]
pub fn notice_banner(props: &NoticeBannerProps) -> Html {
    let Some(notice) = &props.notice else {
        return html! {};
    };

    let class = if notice.success {
        "mb-4 rounded-md border border-green-300 bg-green-50 p-3 text-sm text-green-800"
    } else {
        "mb-4 rounded-md border border-red-300 bg-red-50 p-3 text-sm text-red-800"
    };

    html! {
        <div class={class} role="alert">{&notice.text}</div>
    }
}
