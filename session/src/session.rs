//! The session client surface.

use kite_core::{BatchResult, ConnectionRef, Cursor, PersistenceResult, RowBounds, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Rows of a keyed-map read, indexed by the rendered map key.
pub type KeyedRows = BTreeMap<String, Value>;

/// Receives rows one at a time from a streaming select.
pub trait ResultHandler {
    fn handle_result(&mut self, row: Value);
}

impl<F: FnMut(Value)> ResultHandler for F {
    fn handle_result(&mut self, row: Value) {
        self(row)
    }
}

/// A unit of work against the database.
///
/// Every read and write is addressed by a statement identifier plus a
/// parameter object (`Value::Null` when the statement takes none). A session
/// instance must not be used by more than one thread at a time.
pub trait SqlSession: Send + Sync {
    /// Read at most one row.
    fn select_one(&self, statement: &str, parameter: Value) -> PersistenceResult<Option<Value>>;

    /// Read an ordered list of rows.
    fn select_list(
        &self,
        statement: &str,
        parameter: Value,
        bounds: RowBounds,
    ) -> PersistenceResult<Vec<Value>>;

    /// Read rows keyed by the value of their `map_key` entry.
    fn select_map(
        &self,
        statement: &str,
        parameter: Value,
        map_key: &str,
        bounds: RowBounds,
    ) -> PersistenceResult<KeyedRows>;

    /// Read rows lazily.
    fn select_cursor(
        &self,
        statement: &str,
        parameter: Value,
        bounds: RowBounds,
    ) -> PersistenceResult<Cursor>;

    /// Stream rows into a handler.
    fn select(
        &self,
        statement: &str,
        parameter: Value,
        bounds: RowBounds,
        handler: &mut dyn ResultHandler,
    ) -> PersistenceResult<()>;

    /// Run an insert, returning the affected row count.
    fn insert(&self, statement: &str, parameter: Value) -> PersistenceResult<usize>;

    /// Run an update, returning the affected row count.
    fn update(&self, statement: &str, parameter: Value) -> PersistenceResult<usize>;

    /// Run a delete, returning the affected row count.
    fn delete(&self, statement: &str, parameter: Value) -> PersistenceResult<usize>;

    /// Commit pending work. `force` commits even when nothing is dirty.
    fn commit(&self, force: bool) -> PersistenceResult<()>;

    /// Roll back pending work. `force` rolls back even when nothing is dirty.
    fn rollback(&self, force: bool) -> PersistenceResult<()>;

    /// Execute queued batch statements.
    fn flush_statements(&self) -> PersistenceResult<Vec<BatchResult>>;

    /// Release the session and its connection.
    fn close(&self) -> PersistenceResult<()>;

    /// Clear the session-local cache.
    fn clear_cache(&self) -> PersistenceResult<()>;

    /// The connection this session runs on.
    fn connection(&self) -> PersistenceResult<ConnectionRef>;
}

/// Shared handle to a session.
pub type SessionRef = Arc<dyn SqlSession>;
