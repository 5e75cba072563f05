//! services/api/src/web/middleware.rs
//!
//! Authentication middleware for protecting page routes.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use todo_core::domain::UserId;
use tower_cookies::Cookies;
use tracing::debug;

use crate::web::state::AppState;

/// The logged-in user, available to handlers behind [`require_session`].
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser(pub UserId);

/// Middleware that validates the session cookie and extracts the user id.
///
/// If valid, inserts a [`CurrentUser`] into request extensions for handlers to use.
/// If invalid or missing, redirects the browser to the login page (303).
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(user_id) = state.sessions.current_user(&cookies) else {
        debug!("No valid session for {}, redirecting to login", req.uri().path());
        return Redirect::to("/login").into_response();
    };

    req.extensions_mut().insert(CurrentUser(user_id));
    next.run(req).await
}
