use std::sync::Arc;

use async_graphql::{Context, ErrorExtensions, Object, Result};
use todo_core::accounts::{self, Registration};
use todo_core::domain::UserId;
use todo_core::ports::PasswordService;
use tower_cookies::Cookies;
use tracing::{info, warn};

use super::error::{port_error, GraphError};
use super::types::{AuthPayload, LoginUserInput, NewTodo, RegisterUserInput, TodoNode};
use super::{database, viewer};
use crate::web::session::SessionManager;

#[derive(Default)]
pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Creates a todo owned by `input.userId`, or by the logged-in user when omitted.
    ///
    /// An explicit `userId` is used as given; it is not compared with the session.
    async fn create_todo(&self, ctx: &Context<'_>, input: NewTodo) -> Result<TodoNode> {
        let owner: UserId = match input.user_id {
            // A non-numeric id cannot name a stored user.
            Some(id) => id
                .0
                .parse()
                .map_err(|_| GraphError::OwnerNotFound(id.0.clone()).extend())?,
            None => viewer(ctx).ok_or_else(|| GraphError::NotAuthenticated.extend())?,
        };

        let todo = database(ctx)?
            .create_todo(&input.text, owner)
            .await
            .map_err(port_error)?;
        info!("Created todo {} for user {}", todo.id, owner);
        Ok(TodoNode(todo))
    }

    async fn register_user(
        &self,
        ctx: &Context<'_>,
        input: RegisterUserInput,
    ) -> Result<AuthPayload> {
        let db = database(ctx)?;
        let passwords = ctx.data::<Arc<dyn PasswordService>>()?;

        let confirm_password = input
            .confirm_password
            .unwrap_or_else(|| input.password.clone());
        let form = Registration {
            name: input.name,
            email: input.email,
            password: input.password,
            confirm_password,
        };

        match accounts::register(db.as_ref(), passwords.as_ref(), &form).await {
            Ok(user) => Ok(AuthPayload::ok("Registration complete", user)),
            Err(e) => Ok(AuthPayload::failed(e.to_string())),
        }
    }

    /// Checks the credentials and, on success, sets the session cookie on the response.
    async fn login_user(&self, ctx: &Context<'_>, input: LoginUserInput) -> Result<AuthPayload> {
        let db = database(ctx)?;
        let passwords = ctx.data::<Arc<dyn PasswordService>>()?;

        match accounts::authenticate(db.as_ref(), passwords.as_ref(), &input.email, &input.password)
            .await
        {
            Ok(user) => {
                let sessions = ctx.data::<SessionManager>()?;
                match ctx.data_opt::<Cookies>() {
                    Some(cookies) => sessions.start_session(cookies, user.id),
                    None => warn!("loginUser executed without a cookie jar; no session was set"),
                }
                info!("User {} logged in", user.id);
                Ok(AuthPayload::ok("Login successful", user))
            }
            Err(e) => Ok(AuthPayload::failed(e.to_string())),
        }
    }
}
