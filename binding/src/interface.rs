//! Mapper interface declarations.

use crate::{MapperOutput, MapperProxy};
use kite_core::{PersistenceResult, Value};
use std::fmt;
use std::sync::Arc;

/// What a mapper method hands back to its caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReturnKind {
    /// At most one row.
    One,
    /// An ordered list of rows.
    Many,
    /// Rows keyed by the named column.
    Map { key: String },
    /// A lazy cursor over rows.
    Cursor,
    /// The affected row count.
    Count,
    /// Whether any row was affected.
    Flag,
    /// Nothing.
    Void,
    /// Results of flushed batch statements.
    Batch,
}

impl fmt::Display for ReturnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReturnKind::One => f.write_str("One"),
            ReturnKind::Many => f.write_str("Many"),
            ReturnKind::Map { key } => write!(f, "Map({key})"),
            ReturnKind::Cursor => f.write_str("Cursor"),
            ReturnKind::Count => f.write_str("Count"),
            ReturnKind::Flag => f.write_str("Flag"),
            ReturnKind::Void => f.write_str("Void"),
            ReturnKind::Batch => f.write_str("Batch"),
        }
    }
}

/// Body of a method the interface implements itself.
///
/// Runs against the proxy it was called on, so it may call other methods of
/// the same mapper.
pub type DefaultBody =
    Arc<dyn Fn(&MapperProxy, Vec<Value>) -> PersistenceResult<MapperOutput> + Send + Sync>;

/// One declared mapper method.
#[derive(Clone)]
pub struct MethodDecl {
    pub name: String,
    pub returns: ReturnKind,
    /// Parameter names. Empty when the arguments are positional.
    pub params: Vec<String>,
    /// Statement id, when it is not `<mapper>.<method>`.
    pub statement: Option<String>,
    pub default_body: Option<DefaultBody>,
}

impl MethodDecl {
    pub fn new(name: impl Into<String>, returns: ReturnKind) -> Self {
        Self {
            name: name.into(),
            returns,
            params: Vec::new(),
            statement: None,
            default_body: None,
        }
    }

    /// Name the next parameter.
    pub fn param(mut self, name: impl Into<String>) -> Self {
        self.params.push(name.into());
        self
    }

    /// Route to an explicit statement id.
    pub fn statement(mut self, id: impl Into<String>) -> Self {
        self.statement = Some(id.into());
        self
    }

    /// Implement the method directly instead of routing it to a statement.
    pub fn default_body<F>(mut self, body: F) -> Self
    where
        F: Fn(&MapperProxy, Vec<Value>) -> PersistenceResult<MapperOutput> + Send + Sync + 'static,
    {
        self.default_body = Some(Arc::new(body));
        self
    }

    pub fn has_default_body(&self) -> bool {
        self.default_body.is_some()
    }

    /// The statement this method routes to.
    pub fn statement_id(&self, mapper: &str) -> String {
        match &self.statement {
            Some(id) => id.clone(),
            None => format!("{}.{}", mapper, self.name),
        }
    }
}

impl fmt::Debug for MethodDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDecl")
            .field("name", &self.name)
            .field("returns", &self.returns)
            .field("params", &self.params)
            .field("statement", &self.statement)
            .field("default_body", &self.default_body.is_some())
            .finish()
    }
}

/// A declared mapper: a namespace and its methods.
#[derive(Debug, Clone)]
pub struct MapperInterface {
    name: String,
    methods: Vec<MethodDecl>,
}

impl MapperInterface {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            methods: Vec::new(),
        }
    }

    /// Declare a method.
    pub fn method(mut self, method: MethodDecl) -> Self {
        self.methods.push(method);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn methods(&self) -> &[MethodDecl] {
        &self.methods
    }

    /// Find a method by name.
    pub fn find(&self, name: &str) -> Option<&MethodDecl> {
        self.methods.iter().find(|m| m.name == name)
    }
}
