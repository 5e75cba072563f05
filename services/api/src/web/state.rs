//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use crate::graph::{build_schema, TodoSchema};
use crate::web::session::SessionManager;
use std::sync::Arc;
use todo_core::ports::{DatabaseService, PasswordService};

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
/// Nothing in it is mutated after construction.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn DatabaseService>,
    pub passwords: Arc<dyn PasswordService>,
    pub sessions: SessionManager,
    pub config: Arc<Config>,
    pub schema: TodoSchema,
}

impl AppState {
    pub fn new(
        config: Arc<Config>,
        db: Arc<dyn DatabaseService>,
        passwords: Arc<dyn PasswordService>,
        sessions: SessionManager,
    ) -> Self {
        let schema = build_schema(db.clone(), passwords.clone(), sessions.clone());
        Self {
            db,
            passwords,
            sessions,
            config,
            schema,
        }
    }
}
