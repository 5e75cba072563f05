//! GraphQL object and input types.
//!
//! `Todo.user` and `User.todos` are relationship resolvers: each one issues its
//! own store lookup when selected, so a list of N todos costs N owner lookups.

use async_graphql::{Context, InputObject, Object, Result, SimpleObject, ID};
use chrono::{DateTime, Utc};
use todo_core::domain::{Todo, User};

use super::database;
use super::error::port_error;

pub struct TodoNode(pub Todo);

#[Object(name = "Todo")]
impl TodoNode {
    async fn id(&self) -> ID {
        ID(self.0.id.to_string())
    }

    async fn text(&self) -> &str {
        &self.0.text
    }

    async fn done(&self) -> bool {
        self.0.done
    }

    /// The owner of this todo.
    async fn user(&self, ctx: &Context<'_>) -> Result<UserNode> {
        let user = database(ctx)?
            .get_user_by_id(self.0.user_id)
            .await
            .map_err(port_error)?;
        Ok(UserNode(user))
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.0.created_at
    }

    async fn updated_at(&self) -> DateTime<Utc> {
        self.0.updated_at
    }
}

pub struct UserNode(pub User);

#[Object(name = "User")]
impl UserNode {
    async fn id(&self) -> ID {
        ID(self.0.id.to_string())
    }

    async fn name(&self) -> &str {
        &self.0.name
    }

    async fn email(&self) -> &str {
        &self.0.email
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.0.created_at
    }

    async fn updated_at(&self) -> DateTime<Utc> {
        self.0.updated_at
    }

    /// Todos owned by this user.
    async fn todos(&self, ctx: &Context<'_>) -> Result<Vec<TodoNode>> {
        let todos = database(ctx)?
            .list_todos_by_user(self.0.id)
            .await
            .map_err(port_error)?;
        Ok(todos.into_iter().map(TodoNode).collect())
    }
}

/// Outcome of `registerUser` and `loginUser`.
#[derive(SimpleObject)]
pub struct AuthPayload {
    pub success: bool,
    pub message: String,
    pub user: Option<UserNode>,
}

impl AuthPayload {
    pub fn ok(message: &str, user: User) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            user: Some(UserNode(user)),
        }
    }

    pub fn failed(message: String) -> Self {
        Self {
            success: false,
            message,
            user: None,
        }
    }
}

#[derive(InputObject)]
pub struct NewTodo {
    pub text: String,
    /// Owner of the new todo. Defaults to the logged-in user.
    pub user_id: Option<ID>,
}

#[derive(InputObject)]
pub struct RegisterUserInput {
    pub name: String,
    pub email: String,
    pub password: String,
    /// Defaults to `password` when omitted.
    pub confirm_password: Option<String>,
}

#[derive(InputObject)]
pub struct LoginUserInput {
    pub email: String,
    pub password: String,
}
