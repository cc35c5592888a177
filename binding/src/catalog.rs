//! Statement lookup.

use kite_core::MappedStatement;
use std::collections::HashMap;
use std::sync::Arc;

/// Resolves a statement id to its metadata.
pub trait StatementCatalog: Send + Sync {
    fn mapped_statement(&self, id: &str) -> Option<Arc<MappedStatement>>;
}

/// Statements keyed by id.
#[derive(Debug, Clone, Default)]
pub struct MappedStatements {
    statements: HashMap<String, Arc<MappedStatement>>,
}

impl MappedStatements {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a statement, returning the one it replaced.
    pub fn insert(&mut self, statement: MappedStatement) -> Option<Arc<MappedStatement>> {
        self.statements
            .insert(statement.id.clone(), Arc::new(statement))
    }

    pub fn get(&self, id: &str) -> Option<&Arc<MappedStatement>> {
        self.statements.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.statements.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<MappedStatement>> {
        self.statements.values()
    }
}

impl StatementCatalog for MappedStatements {
    fn mapped_statement(&self, id: &str) -> Option<Arc<MappedStatement>> {
        self.statements.get(id).cloned()
    }
}
