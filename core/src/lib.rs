//! Kite Core Types
//!
//! This crate provides the foundational types shared by every Kite layer:
//! - Values exchanged with the statement-execution layer (the Value enum)
//! - Statement metadata (MappedStatement, SqlCommandType, statement ids)
//! - Execution data (PreparedStatement, ResultSet, RowBounds, BatchResult)
//! - Lazy cursors over result rows
//! - The connection contract and session opening parameters
//! - The runtime error type shared across dispatch boundaries

mod connection;
mod cursor;
mod error;
mod statement;
mod value;

pub use connection::*;
pub use cursor::*;
pub use error::*;
pub use statement::*;
pub use value::*;
