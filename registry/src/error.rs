//! Registry error types.

use kite_binding::BindingError;
use kite_plugin::PluginError;
use thiserror::Error;

/// Errors that can occur during registry construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistryError {
    #[error(transparent)]
    Plugin(#[from] PluginError),

    #[error(transparent)]
    Binding(#[from] BindingError),

    #[error("Duplicate statement id: {0}")]
    DuplicateStatement(String),

    #[error("Invalid statement id: {0}")]
    InvalidStatementId(String),

    #[error("Unknown setting: {0}")]
    UnknownSetting(String),

    #[error("Invalid value {value:?} for setting {key}")]
    InvalidSetting { key: String, value: String },
}

/// Result type for registry construction.
pub type RegistryResult<T> = Result<T, RegistryError>;
