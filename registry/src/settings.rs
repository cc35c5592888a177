//! Runtime settings.

use crate::{RegistryError, RegistryResult};
use kite_core::ExecutorType;
use kite_session::UnmanagedPolicy;

/// Settings applied when the registry is built and when sessions are opened.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Settings {
    /// Executor type of sessions opened without an explicit one.
    pub default_executor_type: ExecutorType,
    /// Timeout in seconds for statements that declare none.
    pub default_statement_timeout: Option<u32>,
    /// What a session manager does with calls outside a managed session.
    pub unmanaged_policy: UnmanagedPolicy,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a setting given by property name.
    pub fn apply(&mut self, key: &str, value: &str) -> RegistryResult<()> {
        let invalid = || RegistryError::InvalidSetting {
            key: key.to_string(),
            value: value.to_string(),
        };
        match key {
            "defaultExecutorType" => {
                self.default_executor_type = ExecutorType::parse(value).ok_or_else(invalid)?;
            }
            "defaultStatementTimeout" => {
                let seconds: u32 = value.trim().parse().map_err(|_| invalid())?;
                self.default_statement_timeout = Some(seconds);
            }
            "unmanagedSessionPolicy" => {
                self.unmanaged_policy = UnmanagedPolicy::parse(value).ok_or_else(invalid)?;
            }
            _ => return Err(RegistryError::UnknownSetting(key.to_string())),
        }
        Ok(())
    }
}
