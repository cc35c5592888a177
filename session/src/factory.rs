//! Opening sessions.

use crate::SessionRef;
use kite_core::{ConnectionRef, ExecutorType, IsolationLevel, PersistenceError, PersistenceResult};

/// How a session should be opened.
///
/// The default opens a session on a pooled connection with the factory's
/// default executor type and transaction settings.
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    pub executor_type: Option<ExecutorType>,
    pub auto_commit: Option<bool>,
    pub isolation: Option<IsolationLevel>,
    pub connection: Option<ConnectionRef>,
}

impl SessionOptions {
    /// Default opening variant.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request an explicit autocommit mode.
    pub fn with_auto_commit(mut self, auto_commit: bool) -> Self {
        self.auto_commit = Some(auto_commit);
        self
    }

    /// Run on a caller-supplied connection.
    pub fn with_connection(mut self, connection: ConnectionRef) -> Self {
        self.connection = Some(connection);
        self
    }

    /// Request an explicit isolation level.
    pub fn with_isolation(mut self, isolation: IsolationLevel) -> Self {
        self.isolation = Some(isolation);
        self
    }

    /// Request an explicit executor type.
    pub fn with_executor_type(mut self, executor_type: ExecutorType) -> Self {
        self.executor_type = Some(executor_type);
        self
    }

    /// Check that the requested combination is openable.
    ///
    /// A caller-supplied connection carries its own autocommit mode and
    /// isolation level, so neither may be requested alongside it.
    pub fn validate(&self) -> PersistenceResult<()> {
        if self.connection.is_some() {
            if self.auto_commit.is_some() {
                return Err(PersistenceError::usage(
                    "cannot request autocommit together with an explicit connection",
                ));
            }
            if self.isolation.is_some() {
                return Err(PersistenceError::usage(
                    "cannot request an isolation level together with an explicit connection",
                ));
            }
        }
        Ok(())
    }
}

/// Opens sessions.
pub trait SqlSessionFactory: Send + Sync {
    /// Open a new session. `options` has already been validated.
    fn open_session(&self, options: &SessionOptions) -> PersistenceResult<SessionRef>;
}
