//! Binding error types.

use kite_core::{PersistenceError, SqlCommandType};
use thiserror::Error;

/// Errors raised while binding mapper interfaces to statements.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BindingError {
    #[error("Type {0} is not known to the MapperRegistry.")]
    UnknownMapper(String),

    #[error("Type {0} is already known to the MapperRegistry.")]
    DuplicateMapper(String),

    #[error("Method {method} is declared more than once on {mapper}")]
    DuplicateMethod { mapper: String, method: String },

    #[error("Parameter {param} is declared more than once on {mapper}.{method}")]
    DuplicateParameter {
        mapper: String,
        method: String,
        param: String,
    },

    #[error("Method {method} is not declared on {mapper}")]
    UnknownMethod { mapper: String, method: String },

    #[error("Invalid bound statement (not found): {statement} for {mapper}.{method}")]
    UnknownStatement {
        mapper: String,
        method: String,
        statement: String,
    },

    #[error("Method {mapper}.{method} cannot return {returns} from a {command} statement")]
    UnsupportedReturn {
        mapper: String,
        method: String,
        command: SqlCommandType,
        returns: String,
    },

    #[error("Invalid statement id: {0}")]
    InvalidStatementId(String),
}

impl From<BindingError> for PersistenceError {
    fn from(err: BindingError) -> Self {
        PersistenceError::binding(err.to_string())
    }
}

/// Result type for binding operations.
pub type BindingResult<T> = Result<T, BindingError>;
