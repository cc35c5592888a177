//! Sessions running mapped statements on an executor.

use crate::Registry;
use kite_core::{
    BatchResult, ConnectionRef, Cursor, ExecutorType, MappedStatement, PersistenceError,
    PersistenceResult, RowBounds, Value,
};
use kite_plugin::Executor;
use kite_session::{
    KeyedRows, ResultHandler, SessionOptions, SessionRef, SqlSession, SqlSessionFactory,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

/// A freshly opened executor and the connection it runs on.
#[derive(Clone)]
pub struct ExecutorHandle {
    pub executor: Arc<dyn Executor>,
    pub connection: ConnectionRef,
}

/// Opens executors for new sessions.
pub trait ExecutorSource: Send + Sync {
    fn open_executor(
        &self,
        executor_type: ExecutorType,
        options: &SessionOptions,
    ) -> PersistenceResult<ExecutorHandle>;
}

/// Session factory over a registry and an executor source.
///
/// Every executor it opens runs through the registry's interceptor chain.
pub struct RegistrySessionFactory {
    registry: Arc<Registry>,
    source: Arc<dyn ExecutorSource>,
}

impl RegistrySessionFactory {
    pub fn new(registry: Arc<Registry>, source: Arc<dyn ExecutorSource>) -> Self {
        Self { registry, source }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }
}

impl SqlSessionFactory for RegistrySessionFactory {
    fn open_session(&self, options: &SessionOptions) -> PersistenceResult<SessionRef> {
        options.validate()?;
        let executor_type = options
            .executor_type
            .unwrap_or(self.registry.settings().default_executor_type);
        let handle = self.source.open_executor(executor_type, options)?;
        let auto_commit = options
            .auto_commit
            .unwrap_or_else(|| options.connection.is_some() && handle.connection.auto_commit());
        let executor = self.registry.new_executor(handle.executor);
        debug!(
            executor_type = %executor_type,
            connection = handle.connection.id(),
            auto_commit,
            "opened session"
        );
        Ok(Arc::new(ExecutorSession {
            registry: Arc::clone(&self.registry),
            executor,
            connection: handle.connection,
            auto_commit,
            dirty: AtomicBool::new(false),
        }))
    }
}

/// Session that resolves statement ids through the registry and hands the
/// work to an executor.
pub struct ExecutorSession {
    registry: Arc<Registry>,
    executor: Arc<dyn Executor>,
    connection: ConnectionRef,
    auto_commit: bool,
    dirty: AtomicBool,
}

impl ExecutorSession {
    fn statement(&self, id: &str) -> PersistenceResult<Arc<MappedStatement>> {
        self.registry.mapped_statement(id).ok_or_else(|| {
            PersistenceError::binding(format!(
                "Mapped Statements collection does not contain value for {id}"
            ))
        })
    }

    fn commit_or_rollback_required(&self, force: bool) -> bool {
        (!self.auto_commit && self.dirty.load(Ordering::Acquire)) || force
    }

    fn write(&self, statement: &str, parameter: Value) -> PersistenceResult<usize> {
        let statement = self.statement(statement)?;
        self.dirty.store(true, Ordering::Release);
        self.executor.update(statement, parameter)
    }
}

impl SqlSession for ExecutorSession {
    fn select_one(&self, statement: &str, parameter: Value) -> PersistenceResult<Option<Value>> {
        let mut rows = self.select_list(statement, parameter, RowBounds::default())?;
        match rows.len() {
            0 => Ok(None),
            1 => Ok(rows.pop()),
            found => Err(PersistenceError::too_many_results(statement, found)),
        }
    }

    fn select_list(
        &self,
        statement: &str,
        parameter: Value,
        bounds: RowBounds,
    ) -> PersistenceResult<Vec<Value>> {
        let statement = self.statement(statement)?;
        self.executor.query(statement, parameter, bounds)
    }

    fn select_map(
        &self,
        statement: &str,
        parameter: Value,
        map_key: &str,
        bounds: RowBounds,
    ) -> PersistenceResult<KeyedRows> {
        let rows = self.select_list(statement, parameter, bounds)?;
        let mut keyed = KeyedRows::new();
        for row in rows {
            let key = row.get(map_key).unwrap_or(&Value::Null).as_key();
            keyed.insert(key, row);
        }
        Ok(keyed)
    }

    fn select_cursor(
        &self,
        statement: &str,
        parameter: Value,
        bounds: RowBounds,
    ) -> PersistenceResult<Cursor> {
        let statement = self.statement(statement)?;
        self.executor.query_cursor(statement, parameter, bounds)
    }

    fn select(
        &self,
        statement: &str,
        parameter: Value,
        bounds: RowBounds,
        handler: &mut dyn ResultHandler,
    ) -> PersistenceResult<()> {
        for row in self.select_cursor(statement, parameter, bounds)? {
            handler.handle_result(row);
        }
        Ok(())
    }

    fn insert(&self, statement: &str, parameter: Value) -> PersistenceResult<usize> {
        self.write(statement, parameter)
    }

    fn update(&self, statement: &str, parameter: Value) -> PersistenceResult<usize> {
        self.write(statement, parameter)
    }

    fn delete(&self, statement: &str, parameter: Value) -> PersistenceResult<usize> {
        self.write(statement, parameter)
    }

    fn commit(&self, force: bool) -> PersistenceResult<()> {
        self.executor
            .commit(self.commit_or_rollback_required(force))?;
        self.dirty.store(false, Ordering::Release);
        Ok(())
    }

    fn rollback(&self, force: bool) -> PersistenceResult<()> {
        self.executor
            .rollback(self.commit_or_rollback_required(force))?;
        self.dirty.store(false, Ordering::Release);
        Ok(())
    }

    fn flush_statements(&self) -> PersistenceResult<Vec<BatchResult>> {
        self.executor.flush_statements()
    }

    fn close(&self) -> PersistenceResult<()> {
        let result = self
            .executor
            .close(self.commit_or_rollback_required(false));
        self.dirty.store(false, Ordering::Release);
        result
    }

    fn clear_cache(&self) -> PersistenceResult<()> {
        self.executor.clear_local_cache()
    }

    fn connection(&self) -> PersistenceResult<ConnectionRef> {
        Ok(Arc::clone(&self.connection))
    }
}
