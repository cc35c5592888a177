//! Plugin error types.

use crate::{Capability, ParamType};
use thiserror::Error;

/// Errors raised while registering interceptors.
///
/// These are configuration errors: they surface at bootstrap, never on a call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PluginError {
    #[error("no signatures declared by interceptor {interceptor}")]
    MissingSignatures { interceptor: String },

    #[error("could not find method on {capability} named {method} with parameters ({})", format_params(.params))]
    MethodNotFound {
        capability: Capability,
        method: String,
        params: Vec<ParamType>,
    },
}

impl PluginError {
    pub fn missing_signatures(interceptor: impl Into<String>) -> Self {
        Self::MissingSignatures {
            interceptor: interceptor.into(),
        }
    }

    pub fn method_not_found(
        capability: Capability,
        method: impl Into<String>,
        params: Vec<ParamType>,
    ) -> Self {
        Self::MethodNotFound {
            capability,
            method: method.into(),
            params,
        }
    }
}

fn format_params(params: &[ParamType]) -> String {
    params
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type for plugin registration.
pub type PluginResult<T> = Result<T, PluginError>;
