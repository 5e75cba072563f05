//! services/api/src/web/todos.rs
//!
//! The authenticated todo list page.

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Extension,
};
use std::sync::Arc;
use todo_core::ports::PortError;
use tracing::{error, warn};

use crate::web::{middleware::CurrentUser, state::AppState, templates};

/// GET /todos - Show the logged-in user's todos
pub async fn show_todos_page(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
) -> Response {
    let result = async {
        let user = state.db.get_user_by_id(user_id).await?;
        let todos = state.db.list_todos_by_user(user_id).await?;
        Ok::<_, PortError>((user, todos))
    }
    .await;

    match result {
        Ok((user, todos)) => Html(templates::todos_page(
            &user,
            &todos,
            state.config.is_development(),
        ))
        .into_response(),
        // A correctly signed token for a user the store no longer knows.
        Err(PortError::NotFound(_)) => {
            warn!("Session refers to unknown user {}", user_id);
            Redirect::to("/login").into_response()
        }
        Err(e) => {
            error!("Failed to load todos page: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}
