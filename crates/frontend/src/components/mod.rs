//! Reusable UI components

pub mod auth_status;
pub mod notice;
pub mod password_meter;
pub mod spinner;
pub mod text_field;

pub use auth_status::AuthStatus;
pub use notice::NoticeBanner;
pub use password_meter::PasswordMeter;
pub use spinner::LoadingSpinner;
pub use text_field::TextField;
