//! crates/todo_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases or hashers.

use async_trait::async_trait;

use crate::domain::{Todo, User, UserCredentials, UserId};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, hashing).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("A user with email {0} already exists")]
    DuplicateEmail(String),
    #[error("Owner {0} does not exist")]
    OwnerNotFound(UserId),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Persistence for users and their todos.
///
/// Constraint enforcement (email uniqueness, todo owner existence) belongs to the
/// implementation's backing store, not to callers.
#[async_trait]
pub trait DatabaseService: Send + Sync {
    // --- Credential Store ---

    /// Inserts a user. Fails with [`PortError::DuplicateEmail`] if the email is taken.
    async fn create_user(
        &self,
        name: &str,
        email: &str,
        hashed_password: &str,
    ) -> PortResult<User>;

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials>;

    async fn get_user_by_id(&self, user_id: UserId) -> PortResult<User>;

    // --- Todo Store ---

    /// Inserts a todo. Fails with [`PortError::OwnerNotFound`] if `user_id` names no user.
    async fn create_todo(&self, text: &str, user_id: UserId) -> PortResult<Todo>;

    async fn list_todos(&self) -> PortResult<Vec<Todo>>;

    async fn list_todos_by_user(&self, user_id: UserId) -> PortResult<Vec<Todo>>;
}

pub trait PasswordService: Send + Sync {
    /// Produces a salted hash suitable for storage.
    fn hash_password(&self, password: &str) -> PortResult<String>;

    /// Returns `Ok(false)` on mismatch and `Err` only if `hash` is malformed.
    fn verify_password(&self, password: &str, hash: &str) -> PortResult<bool>;
}
