use crate::app::Route;
use yew::prelude::*;
use yew_router::prelude::*;

#[function_component(NotFoundPage)]
pub fn not_found_page() -> Html {
    html! {
        <div class="min-h-screen flex flex-col items-center justify-center bg-gray-50">
            <h1 class="text-4xl font-bold text-gray-800 mb-4">{"404"}</h1>
            <p class="text-gray-600 mb-6">{"This page does not exist."}</p>
            <Link<Route> to={Route::Login} classes="text-blue-600 hover:underline">{"Go to login"}</Link<Route>>
        </div>
    }
}
