//! Connection contract and session opening parameters.

use std::fmt;
use std::sync::Arc;

/// A live database connection owned by the execution layer.
pub trait Connection: fmt::Debug + Send + Sync {
    /// Identifier of this connection, unique within its pool.
    fn id(&self) -> u64;

    /// Whether the connection commits after every statement.
    fn auto_commit(&self) -> bool;

    /// Isolation level the connection runs at, if known.
    fn isolation_level(&self) -> Option<IsolationLevel> {
        None
    }
}

/// Shared handle to a connection.
pub type ConnectionRef = Arc<dyn Connection>;

/// How an executor schedules statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExecutorType {
    /// One prepared statement per execution.
    #[default]
    Simple,
    /// Prepared statements are cached and reused.
    Reuse,
    /// Mutations are queued until flushed.
    Batch,
}

impl ExecutorType {
    /// Parse a case-insensitive executor type name.
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "SIMPLE" => Some(ExecutorType::Simple),
            "REUSE" => Some(ExecutorType::Reuse),
            "BATCH" => Some(ExecutorType::Batch),
            _ => None,
        }
    }
}

impl fmt::Display for ExecutorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExecutorType::Simple => "SIMPLE",
            ExecutorType::Reuse => "REUSE",
            ExecutorType::Batch => "BATCH",
        };
        f.write_str(name)
    }
}

/// Transaction isolation level requested when opening a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IsolationLevel {
    None,
    ReadUncommitted,
    ReadCommitted,
    RepeatableRead,
    Serializable,
}
