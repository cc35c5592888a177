//! Runtime error type shared across dispatch boundaries.

use thiserror::Error;

/// Errors raised while executing persistence work.
///
/// Every collaborator contract (executor, statement/parameter/result handlers,
/// sessions, mapper dispatch) returns this type, so a failure raised by a
/// target reaches the caller as the same value no matter how many decorators,
/// proxies or session managers it crossed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PersistenceError {
    /// Failure raised by the statement-execution layer.
    #[error("database error: {message}")]
    Database { message: String },

    /// Operation requires an active managed session, or other API misuse.
    #[error("usage error: {message}")]
    Usage { message: String },

    /// Mapper dispatch failure.
    #[error("binding error: {message}")]
    Binding { message: String },

    /// Interceptor or decorator failure.
    #[error("plugin error: {message}")]
    Plugin { message: String },

    /// A scalar read matched more than one row.
    #[error("expected one result (or none) from {statement}, but found {found}")]
    TooManyResults { statement: String, found: usize },

    /// The executor or session was already closed.
    #[error("{what} is closed")]
    Closed { what: String },
}

impl PersistenceError {
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
        }
    }

    pub fn binding(message: impl Into<String>) -> Self {
        Self::Binding {
            message: message.into(),
        }
    }

    pub fn plugin(message: impl Into<String>) -> Self {
        Self::Plugin {
            message: message.into(),
        }
    }

    pub fn too_many_results(statement: impl Into<String>, found: usize) -> Self {
        Self::TooManyResults {
            statement: statement.into(),
            found,
        }
    }

    pub fn closed(what: impl Into<String>) -> Self {
        Self::Closed { what: what.into() }
    }

    /// Returns true for managed-session misuse.
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::Usage { .. })
    }
}

/// Result type for persistence operations.
pub type PersistenceResult<T> = Result<T, PersistenceError>;
