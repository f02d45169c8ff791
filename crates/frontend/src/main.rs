mod app;
mod components;
mod hooks;
mod pages;

use app::App;
use concierge_frontend_common::logging::init_browser_logging;

fn main() {
    console_error_panic_hook::set_once();
    init_browser_logging();
    tracing::info!(
        api = %concierge_frontend_common::AuthConfig::browser_settings().api_base_url,
        "Starting Concierge"
    );
    yew::Renderer::<App>::new().render();
}
