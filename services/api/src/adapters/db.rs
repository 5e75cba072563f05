//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `DatabaseService` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.
//!
//! Uniqueness of emails and existence of todo owners are enforced by the schema;
//! constraint violations are translated into the matching `PortError` variants.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use todo_core::domain::{Todo, User, UserCredentials, UserId};
use todo_core::ports::{DatabaseService, PortError, PortResult};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `DatabaseService` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct UserRecord {
    id: i64,
    name: String,
    email: String,
    password: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}
impl UserRecord {
    fn to_domain(self) -> User {
        self.to_credentials().user
    }

    fn to_credentials(self) -> UserCredentials {
        let UserRecord {
            id,
            name,
            email,
            password,
            created_at,
            updated_at,
        } = self;
        UserCredentials {
            user: User {
                id,
                name,
                email,
                created_at,
                updated_at,
            },
            hashed_password: password,
        }
    }
}

#[derive(FromRow)]
struct TodoRecord {
    id: i64,
    text: String,
    done: bool,
    user_id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}
impl TodoRecord {
    fn to_domain(self) -> Todo {
        Todo {
            id: self.id,
            text: self.text,
            done: self.done,
            user_id: self.user_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

const USER_COLUMNS: &str = "id, name, email, password, created_at, updated_at";
const TODO_COLUMNS: &str = "id, text, done, user_id, created_at, updated_at";

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}

fn is_foreign_key_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_foreign_key_violation())
}

//=========================================================================================
// `DatabaseService` Trait Implementation
//=========================================================================================

#[async_trait]
impl DatabaseService for DbAdapter {
    async fn create_user(
        &self,
        name: &str,
        email: &str,
        hashed_password: &str,
    ) -> PortResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "INSERT INTO users (name, email, password) VALUES ($1, $2, $3) RETURNING {USER_COLUMNS}"
        ))
        .bind(name)
        .bind(email)
        .bind(hashed_password)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                PortError::DuplicateEmail(email.to_string())
            } else {
                PortError::Unexpected(e.to_string())
            }
        })?;
        Ok(record.to_domain())
    }

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => {
                PortError::NotFound(format!("User with email {} not found", email))
            }
            _ => PortError::Unexpected(e.to_string()),
        })?;
        Ok(record.to_credentials())
    }

    async fn get_user_by_id(&self, user_id: UserId) -> PortResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => PortError::NotFound(format!("User {} not found", user_id)),
            _ => PortError::Unexpected(e.to_string()),
        })?;
        Ok(record.to_domain())
    }

    async fn create_todo(&self, text: &str, user_id: UserId) -> PortResult<Todo> {
        let record = sqlx::query_as::<_, TodoRecord>(&format!(
            "INSERT INTO todos (text, user_id) VALUES ($1, $2) RETURNING {TODO_COLUMNS}"
        ))
        .bind(text)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                PortError::OwnerNotFound(user_id)
            } else {
                PortError::Unexpected(e.to_string())
            }
        })?;
        Ok(record.to_domain())
    }

    async fn list_todos(&self) -> PortResult<Vec<Todo>> {
        let records = sqlx::query_as::<_, TodoRecord>(&format!(
            "SELECT {TODO_COLUMNS} FROM todos ORDER BY id ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let todos = records.into_iter().map(|r| r.to_domain()).collect();
        Ok(todos)
    }

    async fn list_todos_by_user(&self, user_id: UserId) -> PortResult<Vec<Todo>> {
        let records = sqlx::query_as::<_, TodoRecord>(&format!(
            "SELECT {TODO_COLUMNS} FROM todos WHERE user_id = $1 ORDER BY id ASC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let todos = records.into_iter().map(|r| r.to_domain()).collect();
        Ok(todos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> UserRecord {
        let now = Utc::now();
        UserRecord {
            id: 7,
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "$argon2id$stored".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn user_record_splits_into_credentials() {
        let credentials = record().to_credentials();
        assert_eq!(credentials.hashed_password, "$argon2id$stored");
        assert_eq!(credentials.user.id, 7);
        assert_eq!(credentials.user.email, "alice@example.com");
    }

    #[test]
    fn user_record_to_domain_drops_the_hash() {
        let source = record();
        let created_at = source.created_at;
        let user = source.to_domain();
        assert_eq!(user.name, "Alice");
        assert_eq!(user.created_at, created_at);
    }
}
