//! Structured errors returned by the GraphQL resolvers.
//!
//! Each variant carries a stable `extensions.code` so clients can branch on it
//! without parsing messages.

use async_graphql::{Error, ErrorExtensions};
use todo_core::ports::PortError;
use tracing::error;

#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("User {0} does not exist")]
    OwnerNotFound(String),
    #[error("Not authenticated")]
    NotAuthenticated,
    #[error("Internal server error")]
    Internal,
}

impl GraphError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::OwnerNotFound(_) => "OWNER_NOT_FOUND",
            Self::NotAuthenticated => "NOT_AUTHENTICATED",
            Self::Internal => "INTERNAL_ERROR",
        }
    }
}

impl ErrorExtensions for GraphError {
    fn extend(&self) -> Error {
        let code = self.code();
        Error::new(self.to_string()).extend_with(|_, e| e.set("code", code))
    }
}

impl From<PortError> for GraphError {
    fn from(e: PortError) -> Self {
        match e {
            PortError::OwnerNotFound(id) => Self::OwnerNotFound(id.to_string()),
            e => {
                error!("Resolver store call failed: {:?}", e);
                Self::Internal
            }
        }
    }
}

/// Converts a port failure into a client-facing GraphQL error.
pub(crate) fn port_error(e: PortError) -> Error {
    GraphError::from(e).extend()
}
