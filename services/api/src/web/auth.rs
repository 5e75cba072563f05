//! services/api/src/web/auth.rs
//!
//! Server-rendered registration, login, and logout pages.

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use std::sync::Arc;
use todo_core::accounts::{self, LoginError, Registration};
use tower_cookies::Cookies;
use tracing::info;

use crate::web::{state::AppState, templates};

//=========================================================================================
// Request Types
//=========================================================================================

/// Missing form fields deserialize as empty strings so they reach validation.
#[derive(Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default, rename = "confirmPassword")]
    pub confirm_password: String,
}

#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

//=========================================================================================
// Handlers
//=========================================================================================

/// GET /register - Show the registration form
pub async fn show_register_form(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(templates::register_page(
        "",
        "",
        None,
        state.config.is_development(),
    ))
}

/// POST /register - Create a new user account
///
/// A successful registration does not log the user in.
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    Form(form): Form<RegisterForm>,
) -> Response {
    let registration = Registration {
        name: form.name,
        email: form.email,
        password: form.password,
        confirm_password: form.confirm_password,
    };

    match accounts::register(state.db.as_ref(), state.passwords.as_ref(), &registration).await {
        Ok(user) => Html(templates::register_success_page(&user.name, &user.email)).into_response(),
        Err(e) => {
            let status = if e.is_validation() {
                StatusCode::BAD_REQUEST
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            let html = templates::register_page(
                &registration.name,
                &registration.email,
                Some(&e.to_string()),
                state.config.is_development(),
            );
            (status, Html(html)).into_response()
        }
    }
}

/// GET /login - Show the login form
pub async fn show_login_form(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(templates::login_page("", None, state.config.is_development()))
}

/// POST /login - Login with an existing account
///
/// On success the session cookie is set and the browser is sent to `/todos`.
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Form(form): Form<LoginForm>,
) -> Response {
    match accounts::authenticate(
        state.db.as_ref(),
        state.passwords.as_ref(),
        &form.email,
        &form.password,
    )
    .await
    {
        Ok(user) => {
            state.sessions.start_session(&cookies, user.id);
            info!("User {} logged in", user.id);
            Redirect::to("/todos").into_response()
        }
        Err(e) => {
            let status = match e {
                LoginError::MissingFields => StatusCode::BAD_REQUEST,
                LoginError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                LoginError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            };
            let html = templates::login_page(
                &form.email,
                Some(&e.to_string()),
                state.config.is_development(),
            );
            (status, Html(html)).into_response()
        }
    }
}

/// POST /logout - Clear the session cookie
///
/// Tokens are not revoked server-side; a copied token stays valid until it expires.
pub async fn logout_handler(State(state): State<Arc<AppState>>, cookies: Cookies) -> Redirect {
    state.sessions.end_session(&cookies);
    Redirect::to("/login")
}
