//! Reified calls and replies.
//!
//! A `Call` captures one operation together with its arguments so that an
//! interceptor can inspect or rewrite them and proceed zero or more times.
//! A `Reply` is whatever the operation (or the interceptor) produced.

use crate::{Capability, Method};
use kite_core::{
    BatchResult, ConnectionRef, Cursor, MappedStatement, PersistenceError, PersistenceResult,
    PreparedStatement, ResultSet, RowBounds, Value,
};
use std::sync::Arc;

/// Statement handler operations.
#[derive(Debug, Clone)]
pub enum StatementCall {
    Prepare {
        connection: ConnectionRef,
        transaction_timeout: Option<u32>,
    },
    Parameterize {
        statement: PreparedStatement,
    },
    Batch {
        statement: PreparedStatement,
    },
    Update {
        statement: PreparedStatement,
    },
    Query {
        statement: PreparedStatement,
    },
    QueryCursor {
        statement: PreparedStatement,
    },
    BoundSql,
}

/// Parameter handler operations.
#[derive(Debug, Clone)]
pub enum ParameterCall {
    ParameterObject,
    SetParameters { statement: PreparedStatement },
}

/// Result set handler operations.
#[derive(Debug, Clone)]
pub enum ResultSetCall {
    HandleResultSets { results: ResultSet },
    HandleCursorResultSets { results: ResultSet },
    HandleOutputParameters { statement: PreparedStatement },
}

/// Executor operations.
#[derive(Debug, Clone)]
pub enum ExecutorCall {
    Update {
        statement: Arc<MappedStatement>,
        parameter: Value,
    },
    Query {
        statement: Arc<MappedStatement>,
        parameter: Value,
        bounds: RowBounds,
    },
    QueryCursor {
        statement: Arc<MappedStatement>,
        parameter: Value,
        bounds: RowBounds,
    },
    FlushStatements,
    Commit {
        required: bool,
    },
    Rollback {
        required: bool,
    },
    ClearLocalCache,
    Close {
        force_rollback: bool,
    },
    IsClosed,
}

/// A captured call to any capability.
#[derive(Debug, Clone)]
pub enum Call {
    StatementHandler(StatementCall),
    ParameterHandler(ParameterCall),
    ResultSetHandler(ResultSetCall),
    Executor(ExecutorCall),
}

impl Call {
    /// The operation this call invokes.
    pub fn method(&self) -> Method {
        match self {
            Call::StatementHandler(call) => {
                let name = match call {
                    StatementCall::Prepare { .. } => "prepare",
                    StatementCall::Parameterize { .. } => "parameterize",
                    StatementCall::Batch { .. } => "batch",
                    StatementCall::Update { .. } => "update",
                    StatementCall::Query { .. } => "query",
                    StatementCall::QueryCursor { .. } => "query_cursor",
                    StatementCall::BoundSql => "bound_sql",
                };
                Method::new(Capability::StatementHandler, name)
            }
            Call::ParameterHandler(call) => {
                let name = match call {
                    ParameterCall::ParameterObject => "parameter_object",
                    ParameterCall::SetParameters { .. } => "set_parameters",
                };
                Method::new(Capability::ParameterHandler, name)
            }
            Call::ResultSetHandler(call) => {
                let name = match call {
                    ResultSetCall::HandleResultSets { .. } => "handle_result_sets",
                    ResultSetCall::HandleCursorResultSets { .. } => "handle_cursor_result_sets",
                    ResultSetCall::HandleOutputParameters { .. } => "handle_output_parameters",
                };
                Method::new(Capability::ResultSetHandler, name)
            }
            Call::Executor(call) => {
                let name = match call {
                    ExecutorCall::Update { .. } => "update",
                    ExecutorCall::Query { .. } => "query",
                    ExecutorCall::QueryCursor { .. } => "query_cursor",
                    ExecutorCall::FlushStatements => "flush_statements",
                    ExecutorCall::Commit { .. } => "commit",
                    ExecutorCall::Rollback { .. } => "rollback",
                    ExecutorCall::ClearLocalCache => "clear_local_cache",
                    ExecutorCall::Close { .. } => "close",
                    ExecutorCall::IsClosed => "is_closed",
                };
                Method::new(Capability::Executor, name)
            }
        }
    }

    /// The capability declaring this call.
    pub fn capability(&self) -> Capability {
        self.method().capability
    }
}

impl From<StatementCall> for Call {
    fn from(call: StatementCall) -> Self {
        Call::StatementHandler(call)
    }
}

impl From<ParameterCall> for Call {
    fn from(call: ParameterCall) -> Self {
        Call::ParameterHandler(call)
    }
}

impl From<ResultSetCall> for Call {
    fn from(call: ResultSetCall) -> Self {
        Call::ResultSetHandler(call)
    }
}

impl From<ExecutorCall> for Call {
    fn from(call: ExecutorCall) -> Self {
        Call::Executor(call)
    }
}

/// The outcome of a call.
#[derive(Debug)]
pub enum Reply {
    Unit,
    Count(usize),
    Flag(bool),
    Value(Value),
    Rows(Vec<Value>),
    Cursor(Cursor),
    Statement(PreparedStatement),
    Text(String),
    Batch(Vec<BatchResult>),
}

impl Reply {
    fn kind(&self) -> &'static str {
        match self {
            Reply::Unit => "Unit",
            Reply::Count(_) => "Count",
            Reply::Flag(_) => "Flag",
            Reply::Value(_) => "Value",
            Reply::Rows(_) => "Rows",
            Reply::Cursor(_) => "Cursor",
            Reply::Statement(_) => "Statement",
            Reply::Text(_) => "Text",
            Reply::Batch(_) => "Batch",
        }
    }

    fn mismatch(&self, expected: &str) -> PersistenceError {
        PersistenceError::plugin(format!(
            "expected a {} reply, got {}",
            expected,
            self.kind()
        ))
    }

    pub fn into_unit(self) -> PersistenceResult<()> {
        match self {
            Reply::Unit => Ok(()),
            other => Err(other.mismatch("Unit")),
        }
    }

    pub fn into_count(self) -> PersistenceResult<usize> {
        match self {
            Reply::Count(count) => Ok(count),
            other => Err(other.mismatch("Count")),
        }
    }

    pub fn into_flag(self) -> PersistenceResult<bool> {
        match self {
            Reply::Flag(flag) => Ok(flag),
            other => Err(other.mismatch("Flag")),
        }
    }

    pub fn into_value(self) -> PersistenceResult<Value> {
        match self {
            Reply::Value(value) => Ok(value),
            other => Err(other.mismatch("Value")),
        }
    }

    pub fn into_rows(self) -> PersistenceResult<Vec<Value>> {
        match self {
            Reply::Rows(rows) => Ok(rows),
            other => Err(other.mismatch("Rows")),
        }
    }

    pub fn into_cursor(self) -> PersistenceResult<Cursor> {
        match self {
            Reply::Cursor(cursor) => Ok(cursor),
            other => Err(other.mismatch("Cursor")),
        }
    }

    pub fn into_statement(self) -> PersistenceResult<PreparedStatement> {
        match self {
            Reply::Statement(statement) => Ok(statement),
            other => Err(other.mismatch("Statement")),
        }
    }

    pub fn into_text(self) -> PersistenceResult<String> {
        match self {
            Reply::Text(text) => Ok(text),
            other => Err(other.mismatch("Text")),
        }
    }

    pub fn into_batch(self) -> PersistenceResult<Vec<BatchResult>> {
        match self {
            Reply::Batch(results) => Ok(results),
            other => Err(other.mismatch("Batch")),
        }
    }
}
