//! Stub collaborators.

use crate::journal::{Event, Journal};
use kite_binding::{MappedStatements, StatementCatalog};
use kite_core::{
    BatchResult, Connection, ConnectionRef, Cursor, ExecutorType, MappedStatement,
    PersistenceError, PersistenceResult, PreparedStatement, RowBounds, Value,
};
use kite_plugin::{Executor, ParameterHandler, StatementHandler};
use kite_registry::{ExecutorHandle, ExecutorSource};
use kite_session::{
    KeyedRows, ResultHandler, SessionOptions, SessionRef, SqlSession, SqlSessionFactory,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

// ==================== Tables ====================

/// Canned rows and failures per statement id.
#[derive(Debug, Clone, Default)]
pub struct Tables {
    rows: Arc<Mutex<HashMap<String, Vec<Value>>>>,
    failures: Arc<Mutex<HashMap<String, PersistenceError>>>,
}

impl Tables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows returned for `statement`.
    pub fn insert(&self, statement: &str, rows: Vec<Value>) {
        self.rows
            .lock()
            .unwrap()
            .insert(statement.to_string(), rows);
    }

    /// Make `statement` fail with `error`.
    pub fn fail(&self, statement: &str, error: PersistenceError) {
        self.failures
            .lock()
            .unwrap()
            .insert(statement.to_string(), error);
    }

    pub fn rows(&self, statement: &str) -> PersistenceResult<Vec<Value>> {
        if let Some(error) = self.failures.lock().unwrap().get(statement) {
            return Err(error.clone());
        }
        Ok(self
            .rows
            .lock()
            .unwrap()
            .get(statement)
            .cloned()
            .unwrap_or_default())
    }

    /// Affected row count of a write: the number of canned rows, at least 1.
    pub fn affected(&self, statement: &str) -> PersistenceResult<usize> {
        Ok(self.rows(statement)?.len().max(1))
    }
}

// ==================== Connection ====================

#[derive(Debug)]
pub struct StubConnection {
    pub id: u64,
    pub auto_commit: bool,
}

impl StubConnection {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            auto_commit: false,
        }
    }
}

impl Connection for StubConnection {
    fn id(&self) -> u64 {
        self.id
    }

    fn auto_commit(&self) -> bool {
        self.auto_commit
    }
}

// ==================== Sessions ====================

/// Session serving canned rows and journaling every call.
pub struct StubSession {
    id: u64,
    journal: Journal,
    tables: Tables,
    fail_close: bool,
}

impl StubSession {
    pub fn id(&self) -> u64 {
        self.id
    }

    fn called(&self, operation: &'static str, statement: &str) {
        self.journal.record(Event::Called {
            session: self.id,
            operation,
            statement: statement.to_string(),
        });
    }

    fn read(&self, operation: &'static str, statement: &str) -> PersistenceResult<Vec<Value>> {
        self.called(operation, statement);
        self.tables.rows(statement)
    }

    fn write(&self, operation: &'static str, statement: &str) -> PersistenceResult<usize> {
        self.called(operation, statement);
        self.tables.affected(statement)
    }
}

impl SqlSession for StubSession {
    fn select_one(&self, statement: &str, _parameter: Value) -> PersistenceResult<Option<Value>> {
        let mut rows = self.read("select_one", statement)?;
        match rows.len() {
            0 | 1 => Ok(rows.pop()),
            found => Err(PersistenceError::too_many_results(statement, found)),
        }
    }

    fn select_list(
        &self,
        statement: &str,
        _parameter: Value,
        bounds: RowBounds,
    ) -> PersistenceResult<Vec<Value>> {
        Ok(bounds.apply(self.read("select_list", statement)?))
    }

    fn select_map(
        &self,
        statement: &str,
        _parameter: Value,
        map_key: &str,
        bounds: RowBounds,
    ) -> PersistenceResult<KeyedRows> {
        let rows = bounds.apply(self.read("select_map", statement)?);
        Ok(rows
            .into_iter()
            .map(|row| (row.get(map_key).unwrap_or(&Value::Null).as_key(), row))
            .collect())
    }

    fn select_cursor(
        &self,
        statement: &str,
        _parameter: Value,
        bounds: RowBounds,
    ) -> PersistenceResult<Cursor> {
        Ok(Cursor::from_rows(
            bounds.apply(self.read("select_cursor", statement)?),
        ))
    }

    fn select(
        &self,
        statement: &str,
        _parameter: Value,
        bounds: RowBounds,
        handler: &mut dyn ResultHandler,
    ) -> PersistenceResult<()> {
        for row in bounds.apply(self.read("select", statement)?) {
            handler.handle_result(row);
        }
        Ok(())
    }

    fn insert(&self, statement: &str, _parameter: Value) -> PersistenceResult<usize> {
        self.write("insert", statement)
    }

    fn update(&self, statement: &str, _parameter: Value) -> PersistenceResult<usize> {
        self.write("update", statement)
    }

    fn delete(&self, statement: &str, _parameter: Value) -> PersistenceResult<usize> {
        self.write("delete", statement)
    }

    fn commit(&self, force: bool) -> PersistenceResult<()> {
        self.journal.record(Event::Committed {
            session: self.id,
            force,
        });
        Ok(())
    }

    fn rollback(&self, force: bool) -> PersistenceResult<()> {
        self.journal.record(Event::RolledBack {
            session: self.id,
            force,
        });
        Ok(())
    }

    fn flush_statements(&self) -> PersistenceResult<Vec<BatchResult>> {
        self.journal.record(Event::Flushed { session: self.id });
        Ok(Vec::new())
    }

    fn close(&self) -> PersistenceResult<()> {
        self.journal.record(Event::Closed { session: self.id });
        if self.fail_close {
            return Err(PersistenceError::database("connection reset during close"));
        }
        Ok(())
    }

    fn clear_cache(&self) -> PersistenceResult<()> {
        self.journal.record(Event::CacheCleared { session: self.id });
        Ok(())
    }

    fn connection(&self) -> PersistenceResult<ConnectionRef> {
        Ok(Arc::new(StubConnection::new(self.id)))
    }
}

/// Factory opening `StubSession`s numbered from 1.
#[derive(Clone)]
pub struct StubFactory {
    journal: Journal,
    tables: Tables,
    next_id: Arc<AtomicU64>,
    fail_close: Arc<AtomicBool>,
}

impl StubFactory {
    pub fn new(journal: &Journal, tables: &Tables) -> Self {
        Self {
            journal: journal.clone(),
            tables: tables.clone(),
            next_id: Arc::new(AtomicU64::new(1)),
            fail_close: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Sessions opened from now on fail to close.
    pub fn fail_closes(&self) {
        self.fail_close.store(true, Ordering::SeqCst);
    }
}

impl SqlSessionFactory for StubFactory {
    fn open_session(&self, _options: &SessionOptions) -> PersistenceResult<SessionRef> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.journal.record(Event::Opened { session: id });
        Ok(Arc::new(StubSession {
            id,
            journal: self.journal.clone(),
            tables: self.tables.clone(),
            fail_close: self.fail_close.load(Ordering::SeqCst),
        }))
    }
}

// ==================== Executor ====================

/// Executor serving canned rows and journaling every call.
pub struct StubExecutor {
    id: u64,
    journal: Journal,
    tables: Tables,
    closed: AtomicBool,
}

impl StubExecutor {
    pub fn new(id: u64, journal: &Journal, tables: &Tables) -> Self {
        Self {
            id,
            journal: journal.clone(),
            tables: tables.clone(),
            closed: AtomicBool::new(false),
        }
    }

    fn called(&self, operation: &'static str, statement: &MappedStatement) -> PersistenceResult<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(PersistenceError::closed("executor"));
        }
        self.journal.record(Event::Called {
            session: self.id,
            operation,
            statement: statement.id.clone(),
        });
        Ok(())
    }
}

impl Executor for StubExecutor {
    fn update(&self, statement: Arc<MappedStatement>, _parameter: Value) -> PersistenceResult<usize> {
        self.called("update", &statement)?;
        self.tables.affected(&statement.id)
    }

    fn query(
        &self,
        statement: Arc<MappedStatement>,
        _parameter: Value,
        bounds: RowBounds,
    ) -> PersistenceResult<Vec<Value>> {
        self.called("query", &statement)?;
        Ok(bounds.apply(self.tables.rows(&statement.id)?))
    }

    fn query_cursor(
        &self,
        statement: Arc<MappedStatement>,
        _parameter: Value,
        bounds: RowBounds,
    ) -> PersistenceResult<Cursor> {
        self.called("query_cursor", &statement)?;
        Ok(Cursor::from_rows(bounds.apply(self.tables.rows(&statement.id)?)))
    }

    fn flush_statements(&self) -> PersistenceResult<Vec<BatchResult>> {
        self.journal.record(Event::Flushed { session: self.id });
        Ok(Vec::new())
    }

    fn commit(&self, required: bool) -> PersistenceResult<()> {
        self.journal.record(Event::Committed {
            session: self.id,
            force: required,
        });
        Ok(())
    }

    fn rollback(&self, required: bool) -> PersistenceResult<()> {
        self.journal.record(Event::RolledBack {
            session: self.id,
            force: required,
        });
        Ok(())
    }

    fn clear_local_cache(&self) -> PersistenceResult<()> {
        self.journal.record(Event::CacheCleared { session: self.id });
        Ok(())
    }

    fn close(&self, _force_rollback: bool) -> PersistenceResult<()> {
        self.closed.store(true, Ordering::SeqCst);
        self.journal.record(Event::Closed { session: self.id });
        Ok(())
    }

    fn is_closed(&self) -> PersistenceResult<bool> {
        Ok(self.closed.load(Ordering::SeqCst))
    }
}

/// Opens a `StubExecutor` per session, numbered from 1.
#[derive(Clone)]
pub struct StubExecutorSource {
    journal: Journal,
    tables: Tables,
    next_id: Arc<AtomicU64>,
    executor_types: Arc<Mutex<Vec<ExecutorType>>>,
}

impl StubExecutorSource {
    pub fn new(journal: &Journal, tables: &Tables) -> Self {
        Self {
            journal: journal.clone(),
            tables: tables.clone(),
            next_id: Arc::new(AtomicU64::new(1)),
            executor_types: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Executor types requested so far.
    pub fn executor_types(&self) -> Vec<ExecutorType> {
        self.executor_types.lock().unwrap().clone()
    }
}

impl ExecutorSource for StubExecutorSource {
    fn open_executor(
        &self,
        executor_type: ExecutorType,
        options: &SessionOptions,
    ) -> PersistenceResult<ExecutorHandle> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.executor_types.lock().unwrap().push(executor_type);
        self.journal.record(Event::Opened { session: id });
        let connection = match &options.connection {
            Some(connection) => Arc::clone(connection),
            None => Arc::new(StubConnection::new(id)) as ConnectionRef,
        };
        Ok(ExecutorHandle {
            executor: Arc::new(StubExecutor::new(id, &self.journal, &self.tables)),
            connection,
        })
    }
}

// ==================== Handlers ====================

/// Parameter handler holding a fixed parameter object.
pub struct StubParameterHandler {
    parameter: Value,
    journal: Journal,
}

impl StubParameterHandler {
    pub fn new(parameter: impl Into<Value>, journal: &Journal) -> Self {
        Self {
            parameter: parameter.into(),
            journal: journal.clone(),
        }
    }
}

impl ParameterHandler for StubParameterHandler {
    fn parameter_object(&self) -> PersistenceResult<Value> {
        self.journal.record(Event::Executed {
            target: "StubParameterHandler",
            method: "parameter_object",
        });
        Ok(self.parameter.clone())
    }

    fn set_parameters(&self, mut statement: PreparedStatement) -> PersistenceResult<PreparedStatement> {
        self.journal.record(Event::Executed {
            target: "StubParameterHandler",
            method: "set_parameters",
        });
        statement.bind(self.parameter.clone());
        Ok(statement)
    }
}

/// Statement handler for a fixed SQL text.
///
/// Also binds its own parameters, so one instance can be handed out both as
/// a statement handler and as a parameter handler.
pub struct StubStatementHandler {
    sql: String,
    journal: Journal,
}

impl StubStatementHandler {
    pub fn new(sql: impl Into<String>, journal: &Journal) -> Self {
        Self {
            sql: sql.into(),
            journal: journal.clone(),
        }
    }

    fn executed(&self, method: &'static str) {
        self.journal.record(Event::Executed {
            target: "StubStatementHandler",
            method,
        });
    }
}

impl StatementHandler for StubStatementHandler {
    fn prepare(
        &self,
        _connection: ConnectionRef,
        transaction_timeout: Option<u32>,
    ) -> PersistenceResult<PreparedStatement> {
        self.executed("prepare");
        let mut statement = PreparedStatement::new(self.sql.clone());
        statement.apply_transaction_timeout(transaction_timeout);
        Ok(statement)
    }

    fn parameterize(&self, statement: PreparedStatement) -> PersistenceResult<PreparedStatement> {
        self.executed("parameterize");
        Ok(statement)
    }

    fn batch(&self, _statement: PreparedStatement) -> PersistenceResult<()> {
        self.executed("batch");
        Ok(())
    }

    fn update(&self, _statement: PreparedStatement) -> PersistenceResult<usize> {
        self.executed("update");
        Ok(1)
    }

    fn query(&self, _statement: PreparedStatement) -> PersistenceResult<Vec<Value>> {
        self.executed("query");
        Ok(Vec::new())
    }

    fn query_cursor(&self, _statement: PreparedStatement) -> PersistenceResult<Cursor> {
        self.executed("query_cursor");
        Ok(Cursor::empty())
    }

    fn bound_sql(&self) -> PersistenceResult<String> {
        self.executed("bound_sql");
        Ok(self.sql.clone())
    }
}

impl ParameterHandler for StubStatementHandler {
    fn parameter_object(&self) -> PersistenceResult<Value> {
        self.executed("parameter_object");
        Ok(Value::Null)
    }

    fn set_parameters(&self, statement: PreparedStatement) -> PersistenceResult<PreparedStatement> {
        self.executed("set_parameters");
        Ok(statement)
    }
}

// ==================== Catalog ====================

/// Statement catalog counting its lookups.
#[derive(Debug, Default)]
pub struct CountingCatalog {
    statements: MappedStatements,
    lookups: AtomicUsize,
}

impl CountingCatalog {
    pub fn new(statements: MappedStatements) -> Self {
        Self {
            statements,
            lookups: AtomicUsize::new(0),
        }
    }

    /// Lookups performed so far.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl StatementCatalog for CountingCatalog {
    fn mapped_statement(&self, id: &str) -> Option<Arc<MappedStatement>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.statements.mapped_statement(id)
    }
}
