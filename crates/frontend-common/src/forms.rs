//! Login and registration form models with client-side validation

use concierge_http::{LoginRequest, RegisterRequest};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;

/// User-facing validation and result messages
pub mod messages {
    pub const USERNAME_REQUIRED: &str = "Username is required";
    pub const PASSWORD_REQUIRED: &str = "Password is required";
    pub const FULL_NAME_REQUIRED: &str = "Full name is required";
    pub const EMAIL_REQUIRED: &str = "Email is required";
    pub const EMAIL_INVALID: &str = "Please enter a valid email address";
    pub const PASSWORD_LENGTH: &str = "Password must be at least 8 characters";
    pub const PASSWORD_LOWER: &str = "Password must contain a lowercase letter";
    pub const PASSWORD_UPPER: &str = "Password must contain an uppercase letter";
    pub const PASSWORD_NUMBER: &str = "Password must contain a number";
    pub const PASSWORD_SYMBOL: &str = "Password must contain a symbol";
    pub const PHONE_REQUIRED: &str = "Phone number is required";
    pub const FLAT_REQUIRED: &str = "Flat number is required";
    pub const BUILDING_REQUIRED: &str = "Building name is required";

    pub const LOGIN_SUCCESS: &str = "Login successful";
    pub const INVALID_CREDENTIALS: &str = "Invalid credentials";
    pub const LOGIN_FAILED: &str = "Login failed. Please try again.";
    pub const REGISTER_SUCCESS: &str = "Registration successful";
    pub const EMAIL_EXISTS: &str = "An account with this email already exists";
    pub const REGISTER_FAILED: &str = "Registration failed. Please try again.";
}

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\S+@\S+\.\S+$").expect("EMAIL_PATTERN should compile"));

/// Minimum accepted password length
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Highest score returned by [`password_strength`]
pub const MAX_PASSWORD_STRENGTH: u8 = 5;

/// Form inputs that can carry a validation message
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Username,
    Password,
    Name,
    Email,
    PhoneNumber,
    FlatNumber,
    BuildingName,
}

impl Field {
    /// Input name used by the form markup
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Username => "username",
            Self::Password => "password",
            Self::Name => "name",
            Self::Email => "email",
            Self::PhoneNumber => "phoneNumber",
            Self::FlatNumber => "flatNumber",
            Self::BuildingName => "buildingName",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation messages keyed by field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<Field, &'static str>);

impl FieldErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message, keeping the first one reported for the field
    pub fn insert(&mut self, field: Field, message: &'static str) {
        self.0.entry(field).or_insert(message);
    }

    #[must_use]
    pub fn get(&self, field: Field) -> Option<&'static str> {
        self.0.get(&field).copied()
    }

    /// Drop the message of a field the user is editing
    pub fn clear(&mut self, field: Field) {
        self.0.remove(&field);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &'static str)> + '_ {
        self.0.iter().map(|(field, message)| (*field, *message))
    }

    fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

/// Login form contents
#[derive(Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    /// Username or email
    pub username: String,
    pub password: String,
}

impl LoginForm {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Check required fields
    ///
    /// # Errors
    ///
    /// Returns the per-field messages when a required field is empty
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if self.username.is_empty() {
            errors.insert(Field::Username, messages::USERNAME_REQUIRED);
        }
        if self.password.is_empty() {
            errors.insert(Field::Password, messages::PASSWORD_REQUIRED);
        }
        errors.into_result()
    }

    #[must_use]
    pub fn to_request(&self) -> LoginRequest {
        LoginRequest::new(self.username.clone(), self.password.clone())
    }
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Registration form contents
#[derive(Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub phone_number: String,
    pub flat_number: String,
    pub building_name: String,
}

impl RegistrationForm {
    /// Check every field, reporting the first failing rule per field
    ///
    /// # Errors
    ///
    /// Returns the per-field messages when any rule fails
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        if self.name.trim().is_empty() {
            errors.insert(Field::Name, messages::FULL_NAME_REQUIRED);
        }
        if self.username.trim().is_empty() {
            errors.insert(Field::Username, messages::USERNAME_REQUIRED);
        }
        if self.email.trim().is_empty() {
            errors.insert(Field::Email, messages::EMAIL_REQUIRED);
        } else if !EMAIL_PATTERN.is_match(&self.email) {
            errors.insert(Field::Email, messages::EMAIL_INVALID);
        }
        if let Some(message) = password_problem(&self.password) {
            errors.insert(Field::Password, message);
        }
        if self.phone_number.trim().is_empty() {
            errors.insert(Field::PhoneNumber, messages::PHONE_REQUIRED);
        }
        if self.flat_number.trim().is_empty() {
            errors.insert(Field::FlatNumber, messages::FLAT_REQUIRED);
        }
        if self.building_name.trim().is_empty() {
            errors.insert(Field::BuildingName, messages::BUILDING_REQUIRED);
        }

        errors.into_result()
    }

    /// Map the form onto the API's field names
    #[must_use]
    pub fn to_request(&self) -> RegisterRequest {
        RegisterRequest {
            full_name: self.name.clone(),
            email: self.email.clone(),
            phone_number: self.phone_number.clone(),
            password: self.password.clone(),
            building_name: self.building_name.clone(),
            apartment_name: self.flat_number.clone(),
        }
    }
}

impl fmt::Debug for RegistrationForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationForm")
            .field("name", &self.name)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("phone_number", &self.phone_number)
            .field("flat_number", &self.flat_number)
            .field("building_name", &self.building_name)
            .finish()
    }
}

fn has_symbol(c: char) -> bool {
    !c.is_ascii_alphanumeric()
}

fn password_problem(password: &str) -> Option<&'static str> {
    if password.is_empty() {
        Some(messages::PASSWORD_REQUIRED)
    } else if password.chars().count() < MIN_PASSWORD_LENGTH {
        Some(messages::PASSWORD_LENGTH)
    } else if !password.chars().any(|c| c.is_ascii_lowercase()) {
        Some(messages::PASSWORD_LOWER)
    } else if !password.chars().any(|c| c.is_ascii_uppercase()) {
        Some(messages::PASSWORD_UPPER)
    } else if !password.chars().any(|c| c.is_ascii_digit()) {
        Some(messages::PASSWORD_NUMBER)
    } else if !password.chars().any(has_symbol) {
        Some(messages::PASSWORD_SYMBOL)
    } else {
        None
    }
}

/// Score a password from 0 to [`MAX_PASSWORD_STRENGTH`], one point per rule met
#[must_use]
pub fn password_strength(password: &str) -> u8 {
    let rules = [
        password.chars().count() >= MIN_PASSWORD_LENGTH,
        password.chars().any(|c| c.is_ascii_lowercase()),
        password.chars().any(|c| c.is_ascii_uppercase()),
        password.chars().any(|c| c.is_ascii_digit()),
        password.chars().any(has_symbol),
    ];
    rules.into_iter().map(u8::from).sum()
}
