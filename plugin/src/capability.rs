//! Interceptable capability contracts.
//!
//! Four roles of the statement-execution pipeline can be decorated by
//! interceptors. Each role is a trait; an `Arc<dyn Role>` is the unit the
//! chain wraps.

use crate::{Call, Interceptor, Method, MethodDescriptor, ParamType, Reply};
use kite_core::{
    BatchResult, ConnectionRef, Cursor, MappedStatement, PersistenceResult, PreparedStatement,
    ResultSet, RowBounds, Value,
};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// An interceptable role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    StatementHandler,
    ParameterHandler,
    ResultSetHandler,
    Executor,
}

const STATEMENT_HANDLER_METHODS: &[MethodDescriptor] = &[
    MethodDescriptor {
        name: "prepare",
        params: &[ParamType::Connection, ParamType::Timeout],
    },
    MethodDescriptor {
        name: "parameterize",
        params: &[ParamType::Statement],
    },
    MethodDescriptor {
        name: "batch",
        params: &[ParamType::Statement],
    },
    MethodDescriptor {
        name: "update",
        params: &[ParamType::Statement],
    },
    MethodDescriptor {
        name: "query",
        params: &[ParamType::Statement],
    },
    MethodDescriptor {
        name: "query_cursor",
        params: &[ParamType::Statement],
    },
    MethodDescriptor {
        name: "bound_sql",
        params: &[],
    },
];

const PARAMETER_HANDLER_METHODS: &[MethodDescriptor] = &[
    MethodDescriptor {
        name: "parameter_object",
        params: &[],
    },
    MethodDescriptor {
        name: "set_parameters",
        params: &[ParamType::Statement],
    },
];

const RESULT_SET_HANDLER_METHODS: &[MethodDescriptor] = &[
    MethodDescriptor {
        name: "handle_result_sets",
        params: &[ParamType::ResultSet],
    },
    MethodDescriptor {
        name: "handle_cursor_result_sets",
        params: &[ParamType::ResultSet],
    },
    MethodDescriptor {
        name: "handle_output_parameters",
        params: &[ParamType::Statement],
    },
];

const EXECUTOR_METHODS: &[MethodDescriptor] = &[
    MethodDescriptor {
        name: "update",
        params: &[ParamType::MappedStatement, ParamType::Parameter],
    },
    MethodDescriptor {
        name: "query",
        params: &[
            ParamType::MappedStatement,
            ParamType::Parameter,
            ParamType::RowBounds,
        ],
    },
    MethodDescriptor {
        name: "query_cursor",
        params: &[
            ParamType::MappedStatement,
            ParamType::Parameter,
            ParamType::RowBounds,
        ],
    },
    MethodDescriptor {
        name: "flush_statements",
        params: &[],
    },
    MethodDescriptor {
        name: "commit",
        params: &[ParamType::Flag],
    },
    MethodDescriptor {
        name: "rollback",
        params: &[ParamType::Flag],
    },
    MethodDescriptor {
        name: "clear_local_cache",
        params: &[],
    },
    MethodDescriptor {
        name: "close",
        params: &[ParamType::Flag],
    },
    MethodDescriptor {
        name: "is_closed",
        params: &[],
    },
];

impl Capability {
    /// Operations this capability declares.
    pub fn methods(&self) -> &'static [MethodDescriptor] {
        match self {
            Capability::StatementHandler => STATEMENT_HANDLER_METHODS,
            Capability::ParameterHandler => PARAMETER_HANDLER_METHODS,
            Capability::ResultSetHandler => RESULT_SET_HANDLER_METHODS,
            Capability::Executor => EXECUTOR_METHODS,
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Capability::StatementHandler => "StatementHandler",
            Capability::ParameterHandler => "ParameterHandler",
            Capability::ResultSetHandler => "ResultSetHandler",
            Capability::Executor => "Executor",
        };
        f.write_str(name)
    }
}

/// Prepares statements against a connection and runs them.
pub trait StatementHandler: Send + Sync {
    fn prepare(
        &self,
        connection: ConnectionRef,
        transaction_timeout: Option<u32>,
    ) -> PersistenceResult<PreparedStatement>;

    fn parameterize(&self, statement: PreparedStatement) -> PersistenceResult<PreparedStatement>;

    fn batch(&self, statement: PreparedStatement) -> PersistenceResult<()>;

    fn update(&self, statement: PreparedStatement) -> PersistenceResult<usize>;

    fn query(&self, statement: PreparedStatement) -> PersistenceResult<Vec<Value>>;

    fn query_cursor(&self, statement: PreparedStatement) -> PersistenceResult<Cursor>;

    fn bound_sql(&self) -> PersistenceResult<String>;

    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Binds the parameter object onto a prepared statement.
pub trait ParameterHandler: Send + Sync {
    fn parameter_object(&self) -> PersistenceResult<Value>;

    fn set_parameters(&self, statement: PreparedStatement) -> PersistenceResult<PreparedStatement>;

    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Materializes raw result sets into values.
pub trait ResultSetHandler: Send + Sync {
    fn handle_result_sets(&self, results: ResultSet) -> PersistenceResult<Vec<Value>>;

    fn handle_cursor_result_sets(&self, results: ResultSet) -> PersistenceResult<Cursor>;

    fn handle_output_parameters(&self, statement: PreparedStatement) -> PersistenceResult<()>;

    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Runs mapped statements inside a transaction.
pub trait Executor: Send + Sync {
    fn update(&self, statement: Arc<MappedStatement>, parameter: Value) -> PersistenceResult<usize>;

    fn query(
        &self,
        statement: Arc<MappedStatement>,
        parameter: Value,
        bounds: RowBounds,
    ) -> PersistenceResult<Vec<Value>>;

    fn query_cursor(
        &self,
        statement: Arc<MappedStatement>,
        parameter: Value,
        bounds: RowBounds,
    ) -> PersistenceResult<Cursor>;

    fn flush_statements(&self) -> PersistenceResult<Vec<BatchResult>>;

    fn commit(&self, required: bool) -> PersistenceResult<()>;

    fn rollback(&self, required: bool) -> PersistenceResult<()>;

    fn clear_local_cache(&self) -> PersistenceResult<()>;

    fn close(&self, force_rollback: bool) -> PersistenceResult<()>;

    fn is_closed(&self) -> PersistenceResult<bool>;

    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// A capability handle the interceptor chain knows how to wrap.
///
/// Implemented for `dyn StatementHandler`, `dyn ParameterHandler`,
/// `dyn ResultSetHandler` and `dyn Executor`.
pub trait Interceptable: Send + Sync + 'static {
    /// The role this handle plays.
    const CAPABILITY: Capability;

    /// Run a captured call against this target.
    fn dispatch(&self, call: Call) -> PersistenceResult<Reply>;

    /// Concrete type behind the handle.
    fn target_name(&self) -> &'static str;

    /// Wrap `target` so that `methods` are routed through `interceptor`.
    fn decorate(
        target: Arc<Self>,
        interceptor: Arc<dyn Interceptor>,
        methods: Arc<HashSet<Method>>,
    ) -> Arc<Self>;
}
