//! Values returned by mapper methods.

use kite_core::{BatchResult, Cursor, PersistenceError, PersistenceResult, Value};
use kite_session::KeyedRows;

/// Result of a mapper call, shaped by the method's execution mode.
#[derive(Debug)]
pub enum MapperOutput {
    Unit,
    Count(usize),
    Flag(bool),
    One(Option<Value>),
    Many(Vec<Value>),
    Map(KeyedRows),
    Cursor(Cursor),
    Batch(Vec<BatchResult>),
}

impl MapperOutput {
    fn kind(&self) -> &'static str {
        match self {
            MapperOutput::Unit => "unit",
            MapperOutput::Count(_) => "count",
            MapperOutput::Flag(_) => "flag",
            MapperOutput::One(_) => "single row",
            MapperOutput::Many(_) => "row list",
            MapperOutput::Map(_) => "keyed map",
            MapperOutput::Cursor(_) => "cursor",
            MapperOutput::Batch(_) => "batch",
        }
    }

    fn mismatch(expected: &str, got: &MapperOutput) -> PersistenceError {
        PersistenceError::binding(format!(
            "expected a {} result, got a {}",
            expected,
            got.kind()
        ))
    }

    pub fn into_unit(self) -> PersistenceResult<()> {
        match self {
            MapperOutput::Unit => Ok(()),
            other => Err(Self::mismatch("unit", &other)),
        }
    }

    pub fn into_count(self) -> PersistenceResult<usize> {
        match self {
            MapperOutput::Count(count) => Ok(count),
            other => Err(Self::mismatch("count", &other)),
        }
    }

    pub fn into_flag(self) -> PersistenceResult<bool> {
        match self {
            MapperOutput::Flag(flag) => Ok(flag),
            other => Err(Self::mismatch("flag", &other)),
        }
    }

    pub fn into_one(self) -> PersistenceResult<Option<Value>> {
        match self {
            MapperOutput::One(row) => Ok(row),
            other => Err(Self::mismatch("single row", &other)),
        }
    }

    pub fn into_many(self) -> PersistenceResult<Vec<Value>> {
        match self {
            MapperOutput::Many(rows) => Ok(rows),
            other => Err(Self::mismatch("row list", &other)),
        }
    }

    pub fn into_map(self) -> PersistenceResult<KeyedRows> {
        match self {
            MapperOutput::Map(rows) => Ok(rows),
            other => Err(Self::mismatch("keyed map", &other)),
        }
    }

    pub fn into_cursor(self) -> PersistenceResult<Cursor> {
        match self {
            MapperOutput::Cursor(cursor) => Ok(cursor),
            other => Err(Self::mismatch("cursor", &other)),
        }
    }

    pub fn into_batch(self) -> PersistenceResult<Vec<BatchResult>> {
        match self {
            MapperOutput::Batch(results) => Ok(results),
            other => Err(Self::mismatch("batch", &other)),
        }
    }
}
