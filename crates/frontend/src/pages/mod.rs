pub mod login;
pub mod not_found;
pub mod register;

pub use auth_test::AuthTestPage;
pub use login::LoginPage;
pub use not_found::NotFoundPage;
pub use register::RegisterPage;
