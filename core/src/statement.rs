//! Statement metadata and execution data.

use crate::Value;
use regex_lite::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

static STATEMENT_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*(\.[A-Za-z_$][A-Za-z0-9_$]*)*$")
        .expect("statement id pattern is valid")
});

/// Check that a statement identifier is a dotted sequence of identifiers,
/// e.g. `app.StudentMapper.selectById`.
pub fn is_valid_statement_id(id: &str) -> bool {
    STATEMENT_ID.is_match(id)
}

/// The kind of SQL a mapped statement runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SqlCommandType {
    #[default]
    Unknown,
    Insert,
    Update,
    Delete,
    Select,
    Flush,
}

impl SqlCommandType {
    /// Returns true for Insert, Update and Delete.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            SqlCommandType::Insert | SqlCommandType::Update | SqlCommandType::Delete
        )
    }
}

impl fmt::Display for SqlCommandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SqlCommandType::Unknown => "UNKNOWN",
            SqlCommandType::Insert => "INSERT",
            SqlCommandType::Update => "UPDATE",
            SqlCommandType::Delete => "DELETE",
            SqlCommandType::Select => "SELECT",
            SqlCommandType::Flush => "FLUSH",
        };
        f.write_str(name)
    }
}

/// Metadata of one unit of persistence work, addressed by its statement id.
#[derive(Debug, Clone, PartialEq)]
pub struct MappedStatement {
    /// Fully qualified statement identifier.
    pub id: String,
    /// Which read/write variant applies.
    pub command_type: SqlCommandType,
    /// Statement text, opaque to this layer.
    pub sql: String,
    /// Query timeout in seconds.
    pub timeout: Option<u32>,
}

impl MappedStatement {
    /// Create a new mapped statement.
    pub fn new(
        id: impl Into<String>,
        command_type: SqlCommandType,
        sql: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            command_type,
            sql: sql.into(),
            timeout: None,
        }
    }

    /// Set the query timeout.
    pub fn with_timeout(mut self, seconds: u32) -> Self {
        self.timeout = Some(seconds);
        self
    }
}

/// A statement prepared against a connection, with its bound parameters.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PreparedStatement {
    pub sql: String,
    pub parameters: Vec<Value>,
    pub query_timeout: Option<u32>,
}

impl PreparedStatement {
    /// Create a prepared statement with no bound parameters.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            parameters: Vec::new(),
            query_timeout: None,
        }
    }

    /// Bind the next positional parameter.
    pub fn bind(&mut self, value: impl Into<Value>) {
        self.parameters.push(value.into());
    }

    /// Reconcile the statement's query timeout with a transaction timeout.
    ///
    /// The transaction timeout wins when the query has no timeout of its own
    /// (absent or 0) or when it is the shorter of the two.
    pub fn apply_transaction_timeout(&mut self, transaction_timeout: Option<u32>) {
        let Some(transaction_timeout) = transaction_timeout else {
            return;
        };
        let time_to_live = match self.query_timeout {
            None | Some(0) => Some(transaction_timeout),
            Some(query) if transaction_timeout < query => Some(transaction_timeout),
            Some(_) => None,
        };
        if let Some(seconds) = time_to_live {
            self.query_timeout = Some(seconds);
        }
    }
}

/// Raw rows returned by a statement.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl ResultSet {
    /// Create a result set.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self { columns, rows }
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Materialize every row as a `Value::Map` keyed by column name.
    pub fn into_records(self) -> Vec<Value> {
        let columns = self.columns;
        self.rows
            .into_iter()
            .map(|row| {
                let record: BTreeMap<String, Value> =
                    columns.iter().cloned().zip(row).collect();
                Value::Map(record)
            })
            .collect()
    }
}

/// Offset/limit window applied to list and cursor reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowBounds {
    pub offset: usize,
    pub limit: usize,
}

impl RowBounds {
    /// Bounds that skip nothing and return everything.
    pub const UNBOUNDED: RowBounds = RowBounds {
        offset: 0,
        limit: usize::MAX,
    };

    /// Create bounds.
    pub fn new(offset: usize, limit: usize) -> Self {
        Self { offset, limit }
    }

    /// Returns true if these bounds do not restrict anything.
    pub fn is_unbounded(&self) -> bool {
        *self == Self::UNBOUNDED
    }

    /// Apply these bounds to an ordered list of rows.
    pub fn apply<T>(&self, rows: Vec<T>) -> Vec<T> {
        rows.into_iter().skip(self.offset).take(self.limit).collect()
    }
}

impl Default for RowBounds {
    fn default() -> Self {
        Self::UNBOUNDED
    }
}

/// Outcome of one flushed batch.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchResult {
    pub statement_id: String,
    pub sql: String,
    pub parameters: Vec<Value>,
    pub update_counts: Vec<usize>,
}

impl BatchResult {
    /// Create a batch result with no update counts yet.
    pub fn new(statement_id: impl Into<String>, sql: impl Into<String>) -> Self {
        Self {
            statement_id: statement_id.into(),
            sql: sql.into(),
            parameters: Vec::new(),
            update_counts: Vec::new(),
        }
    }

    /// Total rows affected by the batch.
    pub fn total_updated(&self) -> usize {
        self.update_counts.iter().sum()
    }
}
