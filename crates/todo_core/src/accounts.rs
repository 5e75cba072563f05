//! crates/todo_core/src/accounts.rs
//!
//! Registration and login flows. Both are plain functions over the ports so the
//! HTML form handlers and the GraphQL mutations share one implementation.

use tracing::{error, info};

use crate::domain::User;
use crate::ports::{DatabaseService, PasswordService, PortError};

/// Minimum password length, counted in characters.
pub const MIN_PASSWORD_LEN: usize = 6;

//=========================================================================================
// Registration
//=========================================================================================

/// Raw registration input as submitted by the client.
#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Why a registration was refused. The `Display` text is safe to show to users.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    #[error("All fields are required")]
    MissingFields,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Password must be at least 6 characters")]
    PasswordTooShort,
    #[error("This email address is already registered")]
    DuplicateEmail,
    #[error("Registration failed, please try again later")]
    Internal,
}

impl RegistrationError {
    /// True for errors caused by the submitted input rather than the server.
    pub fn is_validation(&self) -> bool {
        !matches!(self, Self::Internal)
    }
}

/// Validates `form` and creates the user.
///
/// Checks run in a fixed order and the first failure wins; the store is only
/// written once every check has passed.
pub async fn register(
    db: &dyn DatabaseService,
    passwords: &dyn PasswordService,
    form: &Registration,
) -> Result<User, RegistrationError> {
    if form.name.is_empty() || form.email.is_empty() || form.password.is_empty() {
        return Err(RegistrationError::MissingFields);
    }
    if form.password != form.confirm_password {
        return Err(RegistrationError::PasswordMismatch);
    }
    if form.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(RegistrationError::PasswordTooShort);
    }

    match db.get_user_by_email(&form.email).await {
        Ok(_) => return Err(RegistrationError::DuplicateEmail),
        Err(PortError::NotFound(_)) => {}
        Err(e) => {
            error!("Failed to look up email during registration: {:?}", e);
            return Err(RegistrationError::Internal);
        }
    }

    let hashed_password = passwords.hash_password(&form.password).map_err(|e| {
        error!("Failed to hash password: {:?}", e);
        RegistrationError::Internal
    })?;

    let user = db
        .create_user(&form.name, &form.email, &hashed_password)
        .await
        .map_err(|e| match e {
            // Lost a race with a concurrent registration of the same email.
            PortError::DuplicateEmail(_) => RegistrationError::DuplicateEmail,
            e => {
                error!("Failed to create user: {:?}", e);
                RegistrationError::Internal
            }
        })?;

    info!("Registered user {}", user.id);
    Ok(user)
}

//=========================================================================================
// Login
//=========================================================================================

/// Why a login was refused.
///
/// An unknown email and a wrong password both map to `InvalidCredentials`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginError {
    #[error("Email and password are required")]
    MissingFields,
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Login failed, please try again later")]
    Internal,
}

/// Checks `email`/`password` against the stored credentials.
///
/// An unknown email still pays for one password hash, so response time does not
/// reveal whether the account exists.
pub async fn authenticate(
    db: &dyn DatabaseService,
    passwords: &dyn PasswordService,
    email: &str,
    password: &str,
) -> Result<User, LoginError> {
    if email.is_empty() || password.is_empty() {
        return Err(LoginError::MissingFields);
    }

    let credentials = match db.get_user_by_email(email).await {
        Ok(credentials) => credentials,
        Err(PortError::NotFound(_)) => {
            let _ = passwords.hash_password(password);
            return Err(LoginError::InvalidCredentials);
        }
        Err(e) => {
            error!("Failed to get user: {:?}", e);
            return Err(LoginError::Internal);
        }
    };

    let valid = passwords
        .verify_password(password, &credentials.hashed_password)
        .map_err(|e| {
            error!("Failed to verify password hash: {:?}", e);
            LoginError::Internal
        })?;

    if !valid {
        return Err(LoginError::InvalidCredentials);
    }
    Ok(credentials.user)
}
