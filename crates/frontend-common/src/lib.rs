pub mod browser;
pub mod config;
pub mod flow;
pub mod forms;
pub mod logging;
pub mod services;

pub use browser::LocalStorageStore;
pub use config::AuthConfig;
pub use flow::{AuthFlow, FlowOutcome, FlowState, PendingRedirect, RedirectSource};
pub use forms::{Field, FieldErrors, LoginForm, RegistrationForm, password_strength};
pub use services::AuthApi;

