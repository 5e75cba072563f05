//! crates/todo_core/src/memory.rs
//!
//! An in-memory implementation of the `DatabaseService` port. It enforces the same
//! constraints as the relational schema (unique emails, todo owners must exist) so
//! it can stand in for the database in tests and local development.
//!
//! Data is lost when the process exits.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::{Todo, TodoId, User, UserCredentials, UserId};
use crate::ports::{DatabaseService, PortError, PortResult};

#[derive(Default)]
struct Tables {
    users: Vec<UserCredentials>,
    todos: Vec<Todo>,
    last_user_id: UserId,
    last_todo_id: TodoId,
}

/// A `DatabaseService` backed by process memory.
#[derive(Clone, Default)]
pub struct InMemoryDatabase {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryDatabase {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DatabaseService for InMemoryDatabase {
    async fn create_user(
        &self,
        name: &str,
        email: &str,
        hashed_password: &str,
    ) -> PortResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|c| c.user.email == email) {
            return Err(PortError::DuplicateEmail(email.to_string()));
        }

        tables.last_user_id += 1;
        let now = Utc::now();
        let user = User {
            id: tables.last_user_id,
            name: name.to_string(),
            email: email.to_string(),
            created_at: now,
            updated_at: now,
        };
        tables.users.push(UserCredentials {
            user: user.clone(),
            hashed_password: hashed_password.to_string(),
        });
        Ok(user)
    }

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials> {
        let tables = self.tables.read().await;
        tables
            .users
            .iter()
            .find(|c| c.user.email == email)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("User with email {} not found", email)))
    }

    async fn get_user_by_id(&self, user_id: UserId) -> PortResult<User> {
        let tables = self.tables.read().await;
        tables
            .users
            .iter()
            .find(|c| c.user.id == user_id)
            .map(|c| c.user.clone())
            .ok_or_else(|| PortError::NotFound(format!("User {} not found", user_id)))
    }

    async fn create_todo(&self, text: &str, user_id: UserId) -> PortResult<Todo> {
        let mut tables = self.tables.write().await;
        if !tables.users.iter().any(|c| c.user.id == user_id) {
            return Err(PortError::OwnerNotFound(user_id));
        }

        tables.last_todo_id += 1;
        let now = Utc::now();
        let todo = Todo {
            id: tables.last_todo_id,
            text: text.to_string(),
            done: false,
            user_id,
            created_at: now,
            updated_at: now,
        };
        tables.todos.push(todo.clone());
        Ok(todo)
    }

    async fn list_todos(&self) -> PortResult<Vec<Todo>> {
        Ok(self.tables.read().await.todos.clone())
    }

    async fn list_todos_by_user(&self, user_id: UserId) -> PortResult<Vec<Todo>> {
        let tables = self.tables.read().await;
        Ok(tables
            .todos
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect())
    }
}
