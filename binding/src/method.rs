//! Resolved mapper methods.

use crate::{BindingError, BindingResult, MapperOutput, MethodDecl, ReturnKind, StatementCatalog};
use kite_core::{
    is_valid_statement_id, PersistenceError, PersistenceResult, RowBounds, SqlCommandType, Value,
};
use kite_session::SqlSession;
use std::collections::BTreeMap;

/// How a mutation's row count is handed back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowCountReturn {
    Count,
    Flag,
    Void,
}

/// Which session operation a method runs and how its result is shaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionMode {
    Insert(RowCountReturn),
    Update(RowCountReturn),
    Delete(RowCountReturn),
    SelectOne,
    SelectList,
    SelectMap { key: String },
    SelectCursor,
    /// Read a single row and drop it.
    SelectDiscard,
    Flush { returns_batch: bool },
}

impl ExecutionMode {
    fn resolve(command: SqlCommandType, returns: &ReturnKind) -> Option<Self> {
        let row_count = match returns {
            ReturnKind::Count => Some(RowCountReturn::Count),
            ReturnKind::Flag => Some(RowCountReturn::Flag),
            ReturnKind::Void => Some(RowCountReturn::Void),
            _ => None,
        };
        match command {
            SqlCommandType::Insert => row_count.map(ExecutionMode::Insert),
            SqlCommandType::Update => row_count.map(ExecutionMode::Update),
            SqlCommandType::Delete => row_count.map(ExecutionMode::Delete),
            SqlCommandType::Select => match returns {
                ReturnKind::One => Some(ExecutionMode::SelectOne),
                ReturnKind::Many => Some(ExecutionMode::SelectList),
                ReturnKind::Map { key } => Some(ExecutionMode::SelectMap { key: key.clone() }),
                ReturnKind::Cursor => Some(ExecutionMode::SelectCursor),
                ReturnKind::Void => Some(ExecutionMode::SelectDiscard),
                _ => None,
            },
            SqlCommandType::Flush => match returns {
                ReturnKind::Batch => Some(ExecutionMode::Flush {
                    returns_batch: true,
                }),
                ReturnKind::Void => Some(ExecutionMode::Flush {
                    returns_batch: false,
                }),
                _ => None,
            },
            SqlCommandType::Unknown => None,
        }
    }
}

/// A mapper method bound to its statement.
#[derive(Debug, Clone, PartialEq)]
pub struct MapperMethod {
    statement_id: String,
    command_type: SqlCommandType,
    mode: ExecutionMode,
    param_names: Vec<String>,
}

impl MapperMethod {
    /// Bind `method` of `mapper` against the catalog.
    pub fn resolve(
        mapper: &str,
        method: &MethodDecl,
        catalog: &dyn StatementCatalog,
    ) -> BindingResult<Self> {
        let statement_id = method.statement_id(mapper);
        if !is_valid_statement_id(&statement_id) {
            return Err(BindingError::InvalidStatementId(statement_id));
        }
        let statement =
            catalog
                .mapped_statement(&statement_id)
                .ok_or_else(|| BindingError::UnknownStatement {
                    mapper: mapper.to_string(),
                    method: method.name.clone(),
                    statement: statement_id.clone(),
                })?;
        let mode = ExecutionMode::resolve(statement.command_type, &method.returns).ok_or_else(
            || BindingError::UnsupportedReturn {
                mapper: mapper.to_string(),
                method: method.name.clone(),
                command: statement.command_type,
                returns: method.returns.to_string(),
            },
        )?;

        Ok(Self {
            statement_id,
            command_type: statement.command_type,
            mode,
            param_names: method.params.clone(),
        })
    }

    pub fn statement_id(&self) -> &str {
        &self.statement_id
    }

    pub fn command_type(&self) -> SqlCommandType {
        self.command_type
    }

    pub fn mode(&self) -> &ExecutionMode {
        &self.mode
    }

    /// Build the parameter object for a call.
    ///
    /// - no arguments: `Null`
    /// - one positional argument: the argument itself
    /// - several positional arguments: `{arg0, arg1, .., param1, param2, ..}`
    /// - named arguments: `{<name>, .., param1, param2, ..}`
    pub fn parameter_object(&self, args: Vec<Value>) -> PersistenceResult<Value> {
        if !self.param_names.is_empty() {
            if args.len() != self.param_names.len() {
                return Err(PersistenceError::binding(format!(
                    "{} expects {} argument(s) ({}), got {}",
                    self.statement_id,
                    self.param_names.len(),
                    self.param_names.join(", "),
                    args.len()
                )));
            }
            let mut params: BTreeMap<String, Value> = self
                .param_names
                .iter()
                .cloned()
                .zip(args.iter().cloned())
                .collect();
            // A declared name always wins over the generic name in its slot.
            for (i, arg) in args.into_iter().enumerate() {
                let generic = format!("param{}", i + 1);
                if !self.param_names.contains(&generic) {
                    params.insert(generic, arg);
                }
            }
            return Ok(Value::Map(params));
        }

        match args.len() {
            0 => Ok(Value::Null),
            1 => Ok(args.into_iter().next().unwrap_or(Value::Null)),
            _ => {
                let mut params = BTreeMap::new();
                for (i, arg) in args.into_iter().enumerate() {
                    params.insert(format!("param{}", i + 1), arg.clone());
                    params.insert(format!("arg{i}"), arg);
                }
                Ok(Value::Map(params))
            }
        }
    }

    /// Run the method against `session`.
    pub fn execute(
        &self,
        session: &dyn SqlSession,
        args: Vec<Value>,
        bounds: RowBounds,
    ) -> PersistenceResult<MapperOutput> {
        let id = self.statement_id.as_str();
        let output = match &self.mode {
            ExecutionMode::Insert(returns) => {
                let rows = session.insert(id, self.parameter_object(args)?)?;
                row_count_output(rows, *returns)
            }
            ExecutionMode::Update(returns) => {
                let rows = session.update(id, self.parameter_object(args)?)?;
                row_count_output(rows, *returns)
            }
            ExecutionMode::Delete(returns) => {
                let rows = session.delete(id, self.parameter_object(args)?)?;
                row_count_output(rows, *returns)
            }
            ExecutionMode::SelectOne => {
                MapperOutput::One(session.select_one(id, self.parameter_object(args)?)?)
            }
            ExecutionMode::SelectList => {
                MapperOutput::Many(session.select_list(id, self.parameter_object(args)?, bounds)?)
            }
            ExecutionMode::SelectMap { key } => MapperOutput::Map(session.select_map(
                id,
                self.parameter_object(args)?,
                key,
                bounds,
            )?),
            ExecutionMode::SelectCursor => MapperOutput::Cursor(session.select_cursor(
                id,
                self.parameter_object(args)?,
                bounds,
            )?),
            ExecutionMode::SelectDiscard => {
                session.select_one(id, self.parameter_object(args)?)?;
                MapperOutput::Unit
            }
            ExecutionMode::Flush { returns_batch } => {
                let results = session.flush_statements()?;
                if *returns_batch {
                    MapperOutput::Batch(results)
                } else {
                    MapperOutput::Unit
                }
            }
        };
        Ok(output)
    }
}

fn row_count_output(rows: usize, returns: RowCountReturn) -> MapperOutput {
    match returns {
        RowCountReturn::Count => MapperOutput::Count(rows),
        RowCountReturn::Flag => MapperOutput::Flag(rows > 0),
        RowCountReturn::Void => MapperOutput::Unit,
    }
}
