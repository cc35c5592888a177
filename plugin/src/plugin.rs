//! The `Plugin` decorator.
//!
//! A `Plugin<dyn Role>` implements exactly the role it wraps. Operations the
//! interceptor declared for that role are captured as an `Invocation` and
//! handed to the interceptor; every other operation is forwarded to the
//! wrapped component unchanged.

use crate::call::{ExecutorCall, ParameterCall, ResultSetCall, StatementCall};
use crate::{
    Call, Capability, Executor, Interceptable, Interceptor, Invocation, Method, ParameterHandler,
    RegisteredInterceptor, Reply, ResultSetHandler, StatementHandler,
};
use kite_core::{
    BatchResult, ConnectionRef, Cursor, MappedStatement, PersistenceError, PersistenceResult,
    PreparedStatement, ResultSet, RowBounds, Value,
};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, trace};

/// Wrap `target` with one registered interceptor.
///
/// Returns `target` itself when the interceptor declares nothing for the
/// target's capability.
pub fn wrap<T: ?Sized + Interceptable>(
    target: Arc<T>,
    interceptor: &RegisteredInterceptor,
) -> Arc<T> {
    match interceptor.signature_map().methods_for(T::CAPABILITY) {
        Some(methods) => {
            debug!(
                interceptor = interceptor.name(),
                capability = %T::CAPABILITY,
                target = target.target_name(),
                "wrapping target"
            );
            T::decorate(
                target,
                Arc::clone(interceptor.interceptor()),
                Arc::clone(methods),
            )
        }
        None => {
            trace!(
                interceptor = interceptor.name(),
                capability = %T::CAPABILITY,
                "interceptor does not apply, target left unwrapped"
            );
            target
        }
    }
}

/// Decorator routing declared operations of one capability through an interceptor.
pub struct Plugin<T: ?Sized> {
    target: Arc<T>,
    interceptor: Arc<dyn Interceptor>,
    methods: Arc<HashSet<Method>>,
}

impl<T: ?Sized + Interceptable> Plugin<T> {
    /// Create a decorator.
    pub fn new(
        target: Arc<T>,
        interceptor: Arc<dyn Interceptor>,
        methods: Arc<HashSet<Method>>,
    ) -> Self {
        Self {
            target,
            interceptor,
            methods,
        }
    }

    /// The wrapped component.
    pub fn target(&self) -> &Arc<T> {
        &self.target
    }

    fn intercepts(&self, name: &'static str) -> bool {
        self.methods.contains(&Method::new(T::CAPABILITY, name))
    }

    fn intercept(&self, call: Call) -> PersistenceResult<Reply> {
        self.interceptor
            .intercept(Invocation::new(&self.target, call))
    }
}

fn misrouted(capability: Capability, call: &Call) -> PersistenceError {
    PersistenceError::plugin(format!(
        "{} cannot be dispatched to a {}",
        call.method(),
        capability
    ))
}

// ==================== StatementHandler ====================

impl Interceptable for dyn StatementHandler {
    const CAPABILITY: Capability = Capability::StatementHandler;

    fn dispatch(&self, call: Call) -> PersistenceResult<Reply> {
        match call {
            Call::StatementHandler(call) => match call {
                StatementCall::Prepare {
                    connection,
                    transaction_timeout,
                } => self
                    .prepare(connection, transaction_timeout)
                    .map(Reply::Statement),
                StatementCall::Parameterize { statement } => {
                    self.parameterize(statement).map(Reply::Statement)
                }
                StatementCall::Batch { statement } => self.batch(statement).map(|()| Reply::Unit),
                StatementCall::Update { statement } => self.update(statement).map(Reply::Count),
                StatementCall::Query { statement } => self.query(statement).map(Reply::Rows),
                StatementCall::QueryCursor { statement } => {
                    self.query_cursor(statement).map(Reply::Cursor)
                }
                StatementCall::BoundSql => self.bound_sql().map(Reply::Text),
            },
            other => Err(misrouted(Self::CAPABILITY, &other)),
        }
    }

    fn target_name(&self) -> &'static str {
        StatementHandler::type_name(self)
    }

    fn decorate(
        target: Arc<Self>,
        interceptor: Arc<dyn Interceptor>,
        methods: Arc<HashSet<Method>>,
    ) -> Arc<Self> {
        Arc::new(Plugin::new(target, interceptor, methods))
    }
}

impl StatementHandler for Plugin<dyn StatementHandler> {
    fn prepare(
        &self,
        connection: ConnectionRef,
        transaction_timeout: Option<u32>,
    ) -> PersistenceResult<PreparedStatement> {
        if !self.intercepts("prepare") {
            return self.target.prepare(connection, transaction_timeout);
        }
        self.intercept(
            StatementCall::Prepare {
                connection,
                transaction_timeout,
            }
            .into(),
        )?
        .into_statement()
    }

    fn parameterize(&self, statement: PreparedStatement) -> PersistenceResult<PreparedStatement> {
        if !self.intercepts("parameterize") {
            return self.target.parameterize(statement);
        }
        self.intercept(StatementCall::Parameterize { statement }.into())?
            .into_statement()
    }

    fn batch(&self, statement: PreparedStatement) -> PersistenceResult<()> {
        if !self.intercepts("batch") {
            return self.target.batch(statement);
        }
        self.intercept(StatementCall::Batch { statement }.into())?
            .into_unit()
    }

    fn update(&self, statement: PreparedStatement) -> PersistenceResult<usize> {
        if !self.intercepts("update") {
            return self.target.update(statement);
        }
        self.intercept(StatementCall::Update { statement }.into())?
            .into_count()
    }

    fn query(&self, statement: PreparedStatement) -> PersistenceResult<Vec<Value>> {
        if !self.intercepts("query") {
            return self.target.query(statement);
        }
        self.intercept(StatementCall::Query { statement }.into())?
            .into_rows()
    }

    fn query_cursor(&self, statement: PreparedStatement) -> PersistenceResult<Cursor> {
        if !self.intercepts("query_cursor") {
            return self.target.query_cursor(statement);
        }
        self.intercept(StatementCall::QueryCursor { statement }.into())?
            .into_cursor()
    }

    fn bound_sql(&self) -> PersistenceResult<String> {
        if !self.intercepts("bound_sql") {
            return self.target.bound_sql();
        }
        self.intercept(StatementCall::BoundSql.into())?.into_text()
    }

    fn type_name(&self) -> &'static str {
        self.target.type_name()
    }
}

// ==================== ParameterHandler ====================

impl Interceptable for dyn ParameterHandler {
    const CAPABILITY: Capability = Capability::ParameterHandler;

    fn dispatch(&self, call: Call) -> PersistenceResult<Reply> {
        match call {
            Call::ParameterHandler(call) => match call {
                ParameterCall::ParameterObject => self.parameter_object().map(Reply::Value),
                ParameterCall::SetParameters { statement } => {
                    self.set_parameters(statement).map(Reply::Statement)
                }
            },
            other => Err(misrouted(Self::CAPABILITY, &other)),
        }
    }

    fn target_name(&self) -> &'static str {
        ParameterHandler::type_name(self)
    }

    fn decorate(
        target: Arc<Self>,
        interceptor: Arc<dyn Interceptor>,
        methods: Arc<HashSet<Method>>,
    ) -> Arc<Self> {
        Arc::new(Plugin::new(target, interceptor, methods))
    }
}

impl ParameterHandler for Plugin<dyn ParameterHandler> {
    fn parameter_object(&self) -> PersistenceResult<Value> {
        if !self.intercepts("parameter_object") {
            return self.target.parameter_object();
        }
        self.intercept(ParameterCall::ParameterObject.into())?
            .into_value()
    }

    fn set_parameters(&self, statement: PreparedStatement) -> PersistenceResult<PreparedStatement> {
        if !self.intercepts("set_parameters") {
            return self.target.set_parameters(statement);
        }
        self.intercept(ParameterCall::SetParameters { statement }.into())?
            .into_statement()
    }

    fn type_name(&self) -> &'static str {
        self.target.type_name()
    }
}

// ==================== ResultSetHandler ====================

impl Interceptable for dyn ResultSetHandler {
    const CAPABILITY: Capability = Capability::ResultSetHandler;

    fn dispatch(&self, call: Call) -> PersistenceResult<Reply> {
        match call {
            Call::ResultSetHandler(call) => match call {
                ResultSetCall::HandleResultSets { results } => {
                    self.handle_result_sets(results).map(Reply::Rows)
                }
                ResultSetCall::HandleCursorResultSets { results } => {
                    self.handle_cursor_result_sets(results).map(Reply::Cursor)
                }
                ResultSetCall::HandleOutputParameters { statement } => self
                    .handle_output_parameters(statement)
                    .map(|()| Reply::Unit),
            },
            other => Err(misrouted(Self::CAPABILITY, &other)),
        }
    }

    fn target_name(&self) -> &'static str {
        ResultSetHandler::type_name(self)
    }

    fn decorate(
        target: Arc<Self>,
        interceptor: Arc<dyn Interceptor>,
        methods: Arc<HashSet<Method>>,
    ) -> Arc<Self> {
        Arc::new(Plugin::new(target, interceptor, methods))
    }
}

impl ResultSetHandler for Plugin<dyn ResultSetHandler> {
    fn handle_result_sets(&self, results: ResultSet) -> PersistenceResult<Vec<Value>> {
        if !self.intercepts("handle_result_sets") {
            return self.target.handle_result_sets(results);
        }
        self.intercept(ResultSetCall::HandleResultSets { results }.into())?
            .into_rows()
    }

    fn handle_cursor_result_sets(&self, results: ResultSet) -> PersistenceResult<Cursor> {
        if !self.intercepts("handle_cursor_result_sets") {
            return self.target.handle_cursor_result_sets(results);
        }
        self.intercept(ResultSetCall::HandleCursorResultSets { results }.into())?
            .into_cursor()
    }

    fn handle_output_parameters(&self, statement: PreparedStatement) -> PersistenceResult<()> {
        if !self.intercepts("handle_output_parameters") {
            return self.target.handle_output_parameters(statement);
        }
        self.intercept(ResultSetCall::HandleOutputParameters { statement }.into())?
            .into_unit()
    }

    fn type_name(&self) -> &'static str {
        self.target.type_name()
    }
}

// ==================== Executor ====================

impl Interceptable for dyn Executor {
    const CAPABILITY: Capability = Capability::Executor;

    fn dispatch(&self, call: Call) -> PersistenceResult<Reply> {
        match call {
            Call::Executor(call) => match call {
                ExecutorCall::Update {
                    statement,
                    parameter,
                } => self.update(statement, parameter).map(Reply::Count),
                ExecutorCall::Query {
                    statement,
                    parameter,
                    bounds,
                } => self.query(statement, parameter, bounds).map(Reply::Rows),
                ExecutorCall::QueryCursor {
                    statement,
                    parameter,
                    bounds,
                } => self
                    .query_cursor(statement, parameter, bounds)
                    .map(Reply::Cursor),
                ExecutorCall::FlushStatements => self.flush_statements().map(Reply::Batch),
                ExecutorCall::Commit { required } => self.commit(required).map(|()| Reply::Unit),
                ExecutorCall::Rollback { required } => {
                    self.rollback(required).map(|()| Reply::Unit)
                }
                ExecutorCall::ClearLocalCache => self.clear_local_cache().map(|()| Reply::Unit),
                ExecutorCall::Close { force_rollback } => {
                    self.close(force_rollback).map(|()| Reply::Unit)
                }
                ExecutorCall::IsClosed => self.is_closed().map(Reply::Flag),
            },
            other => Err(misrouted(Self::CAPABILITY, &other)),
        }
    }

    fn target_name(&self) -> &'static str {
        Executor::type_name(self)
    }

    fn decorate(
        target: Arc<Self>,
        interceptor: Arc<dyn Interceptor>,
        methods: Arc<HashSet<Method>>,
    ) -> Arc<Self> {
        Arc::new(Plugin::new(target, interceptor, methods))
    }
}

impl Executor for Plugin<dyn Executor> {
    fn update(&self, statement: Arc<MappedStatement>, parameter: Value) -> PersistenceResult<usize> {
        if !self.intercepts("update") {
            return self.target.update(statement, parameter);
        }
        self.intercept(
            ExecutorCall::Update {
                statement,
                parameter,
            }
            .into(),
        )?
        .into_count()
    }

    fn query(
        &self,
        statement: Arc<MappedStatement>,
        parameter: Value,
        bounds: RowBounds,
    ) -> PersistenceResult<Vec<Value>> {
        if !self.intercepts("query") {
            return self.target.query(statement, parameter, bounds);
        }
        self.intercept(
            ExecutorCall::Query {
                statement,
                parameter,
                bounds,
            }
            .into(),
        )?
        .into_rows()
    }

    fn query_cursor(
        &self,
        statement: Arc<MappedStatement>,
        parameter: Value,
        bounds: RowBounds,
    ) -> PersistenceResult<Cursor> {
        if !self.intercepts("query_cursor") {
            return self.target.query_cursor(statement, parameter, bounds);
        }
        self.intercept(
            ExecutorCall::QueryCursor {
                statement,
                parameter,
                bounds,
            }
            .into(),
        )?
        .into_cursor()
    }

    fn flush_statements(&self) -> PersistenceResult<Vec<BatchResult>> {
        if !self.intercepts("flush_statements") {
            return self.target.flush_statements();
        }
        self.intercept(ExecutorCall::FlushStatements.into())?
            .into_batch()
    }

    fn commit(&self, required: bool) -> PersistenceResult<()> {
        if !self.intercepts("commit") {
            return self.target.commit(required);
        }
        self.intercept(ExecutorCall::Commit { required }.into())?
            .into_unit()
    }

    fn rollback(&self, required: bool) -> PersistenceResult<()> {
        if !self.intercepts("rollback") {
            return self.target.rollback(required);
        }
        self.intercept(ExecutorCall::Rollback { required }.into())?
            .into_unit()
    }

    fn clear_local_cache(&self) -> PersistenceResult<()> {
        if !self.intercepts("clear_local_cache") {
            return self.target.clear_local_cache();
        }
        self.intercept(ExecutorCall::ClearLocalCache.into())?
            .into_unit()
    }

    fn close(&self, force_rollback: bool) -> PersistenceResult<()> {
        if !self.intercepts("close") {
            return self.target.close(force_rollback);
        }
        self.intercept(ExecutorCall::Close { force_rollback }.into())?
            .into_unit()
    }

    fn is_closed(&self) -> PersistenceResult<bool> {
        if !self.intercepts("is_closed") {
            return self.target.is_closed();
        }
        self.intercept(ExecutorCall::IsClosed.into())?.into_flag()
    }

    fn type_name(&self) -> &'static str {
        self.target.type_name()
    }
}
