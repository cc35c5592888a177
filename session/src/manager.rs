//! The session lifecycle manager.
//!
//! A `SessionManager` is itself a `SqlSession`. Each call looks at the
//! calling thread's managed slot: when a session was started there, the call
//! goes to it; otherwise the call runs in a one-shot session that is
//! committed or rolled back and closed before the call returns.

use crate::slot::SessionSlot;
use crate::{
    run_auto_managed, KeyedRows, ResultHandler, SessionOptions, SessionRef, SqlSession,
    SqlSessionFactory,
};
use kite_core::{
    BatchResult, ConnectionRef, Cursor, PersistenceError, PersistenceResult, RowBounds, Value,
};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// What a manager does with a call when no managed session is started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnmanagedPolicy {
    /// Run the call in its own auto-committing session.
    #[default]
    AutoCommit,
    /// As `AutoCommit`, and log a warning for each such call.
    Warn,
    /// Refuse the call with a usage error.
    Reject,
}

impl UnmanagedPolicy {
    /// Parse a policy name, case-insensitively.
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "autocommit" | "auto_commit" => Some(Self::AutoCommit),
            "warn" => Some(Self::Warn),
            "reject" => Some(Self::Reject),
            _ => None,
        }
    }
}

impl fmt::Display for UnmanagedPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::AutoCommit => "AUTOCOMMIT",
            Self::Warn => "WARN",
            Self::Reject => "REJECT",
        };
        f.write_str(name)
    }
}

/// Thread-confined session reuse over a session factory.
///
/// Dropping the manager releases only the dropping thread's managed session.
/// A session still started on another thread stays bound to that thread until
/// it is closed there or the thread exits.
pub struct SessionManager {
    slot: SessionSlot,
    factory: Arc<dyn SqlSessionFactory>,
    policy: UnmanagedPolicy,
}

impl SessionManager {
    /// Create a manager with the default unmanaged policy.
    pub fn new(factory: Arc<dyn SqlSessionFactory>) -> Self {
        Self {
            slot: SessionSlot::new(),
            factory,
            policy: UnmanagedPolicy::default(),
        }
    }

    /// Set the unmanaged policy.
    pub fn with_unmanaged_policy(mut self, policy: UnmanagedPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The underlying factory.
    pub fn factory(&self) -> &Arc<dyn SqlSessionFactory> {
        &self.factory
    }

    pub fn unmanaged_policy(&self) -> UnmanagedPolicy {
        self.policy
    }

    /// Open an independent session the caller owns.
    ///
    /// The session is not placed in the managed slot.
    pub fn open_session(&self, options: &SessionOptions) -> PersistenceResult<SessionRef> {
        options.validate()?;
        self.factory.open_session(options)
    }

    /// Start a managed session on the calling thread with default options.
    pub fn start(&self) -> PersistenceResult<()> {
        self.start_with(&SessionOptions::default())
    }

    /// Start a managed session on the calling thread.
    ///
    /// A session already started on this thread is replaced and left open.
    pub fn start_with(&self, options: &SessionOptions) -> PersistenceResult<()> {
        let session = self.open_session(options)?;
        if self.slot.replace(session).is_some() {
            warn!("managed session replaced without being closed");
        }
        debug!("managed session started");
        Ok(())
    }

    /// Check if the calling thread has a managed session.
    pub fn is_managed_session_started(&self) -> bool {
        self.slot.is_occupied()
    }

    fn require_managed(&self, action: &str) -> PersistenceResult<SessionRef> {
        self.slot.get().ok_or_else(|| {
            PersistenceError::usage(format!("Cannot {action}. No managed session is started."))
        })
    }

    fn route<T, F>(&self, operation: &str, call: F) -> PersistenceResult<T>
    where
        F: FnOnce(&dyn SqlSession) -> PersistenceResult<T>,
    {
        if let Some(session) = self.slot.get() {
            return call(session.as_ref());
        }
        match self.policy {
            UnmanagedPolicy::AutoCommit => run_auto_managed(self.factory.as_ref(), operation, call),
            UnmanagedPolicy::Warn => {
                warn!(operation, "no managed session started; running in a one-shot session");
                run_auto_managed(self.factory.as_ref(), operation, call)
            }
            UnmanagedPolicy::Reject => Err(PersistenceError::usage(format!(
                "Cannot {operation}. No managed session is started."
            ))),
        }
    }
}

impl fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionManager")
            .field("slot", &self.slot)
            .field("policy", &self.policy)
            .finish()
    }
}

impl Drop for SessionManager {
    fn drop(&mut self) {
        self.slot.take();
    }
}

impl SqlSession for SessionManager {
    fn select_one(&self, statement: &str, parameter: Value) -> PersistenceResult<Option<Value>> {
        self.route("select_one", |session| session.select_one(statement, parameter))
    }

    fn select_list(
        &self,
        statement: &str,
        parameter: Value,
        bounds: RowBounds,
    ) -> PersistenceResult<Vec<Value>> {
        self.route("select_list", |session| {
            session.select_list(statement, parameter, bounds)
        })
    }

    fn select_map(
        &self,
        statement: &str,
        parameter: Value,
        map_key: &str,
        bounds: RowBounds,
    ) -> PersistenceResult<KeyedRows> {
        self.route("select_map", |session| {
            session.select_map(statement, parameter, map_key, bounds)
        })
    }

    fn select_cursor(
        &self,
        statement: &str,
        parameter: Value,
        bounds: RowBounds,
    ) -> PersistenceResult<Cursor> {
        self.route("select_cursor", |session| {
            session.select_cursor(statement, parameter, bounds)
        })
    }

    fn select(
        &self,
        statement: &str,
        parameter: Value,
        bounds: RowBounds,
        handler: &mut dyn ResultHandler,
    ) -> PersistenceResult<()> {
        self.route("select", |session| {
            session.select(statement, parameter, bounds, handler)
        })
    }

    fn insert(&self, statement: &str, parameter: Value) -> PersistenceResult<usize> {
        self.route("insert", |session| session.insert(statement, parameter))
    }

    fn update(&self, statement: &str, parameter: Value) -> PersistenceResult<usize> {
        self.route("update", |session| session.update(statement, parameter))
    }

    fn delete(&self, statement: &str, parameter: Value) -> PersistenceResult<usize> {
        self.route("delete", |session| session.delete(statement, parameter))
    }

    fn commit(&self, force: bool) -> PersistenceResult<()> {
        self.require_managed("commit")?.commit(force)
    }

    fn rollback(&self, force: bool) -> PersistenceResult<()> {
        self.require_managed("rollback")?.rollback(force)
    }

    fn flush_statements(&self) -> PersistenceResult<Vec<BatchResult>> {
        self.require_managed("flush statements")?.flush_statements()
    }

    fn close(&self) -> PersistenceResult<()> {
        let session = self.require_managed("close")?;
        let result = session.close();
        self.slot.take();
        debug!(closed = result.is_ok(), "managed session closed");
        result
    }

    fn clear_cache(&self) -> PersistenceResult<()> {
        self.require_managed("clear the cache")?.clear_cache()
    }

    fn connection(&self) -> PersistenceResult<ConnectionRef> {
        self.require_managed("get connection")?.connection()
    }
}
