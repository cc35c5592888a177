//! Per-interface method cache.

use crate::{BindingError, BindingResult, DefaultBody, MapperInterface, MapperMethod, StatementCatalog};
use dashmap::DashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// How a mapper method is served.
#[derive(Clone)]
pub enum MethodHandler {
    /// Routed to a statement through the session.
    Statement(MapperMethod),
    /// Implemented by the interface itself.
    Default(DefaultBody),
}

impl fmt::Debug for MethodHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MethodHandler::Statement(method) => f.debug_tuple("Statement").field(method).finish(),
            MethodHandler::Default(_) => f.write_str("Default"),
        }
    }
}

/// One registered mapper interface.
///
/// Every proxy for the interface shares this registration, and with it the
/// method cache.
pub struct MapperRegistration {
    interface: MapperInterface,
    catalog: Arc<dyn StatementCatalog>,
    methods: DashMap<String, Arc<MethodHandler>>,
}

impl MapperRegistration {
    pub fn new(interface: MapperInterface, catalog: Arc<dyn StatementCatalog>) -> Self {
        Self {
            interface,
            catalog,
            methods: DashMap::new(),
        }
    }

    pub fn interface(&self) -> &MapperInterface {
        &self.interface
    }

    pub fn name(&self) -> &str {
        self.interface.name()
    }

    /// Number of methods resolved so far.
    pub fn cached_methods(&self) -> usize {
        self.methods.len()
    }

    /// The handler for `method`, built on first use.
    pub fn handler(&self, method: &str) -> BindingResult<Arc<MethodHandler>> {
        if let Some(handler) = self.methods.get(method) {
            return Ok(Arc::clone(handler.value()));
        }
        // The entry guard holds the shard lock while building, so concurrent
        // first calls for the same method build it once.
        let entry = self
            .methods
            .entry(method.to_string())
            .or_try_insert_with(|| self.build_handler(method).map(Arc::new))?;
        Ok(Arc::clone(entry.value()))
    }

    /// Resolve `method` without caching it.
    pub fn build_handler(&self, method: &str) -> BindingResult<MethodHandler> {
        let decl = self
            .interface
            .find(method)
            .ok_or_else(|| BindingError::UnknownMethod {
                mapper: self.name().to_string(),
                method: method.to_string(),
            })?;
        let handler = match &decl.default_body {
            Some(body) => MethodHandler::Default(Arc::clone(body)),
            None => MethodHandler::Statement(MapperMethod::resolve(
                self.name(),
                decl,
                self.catalog.as_ref(),
            )?),
        };
        debug!(mapper = self.name(), method, "constructed mapper method handler");
        Ok(handler)
    }
}

impl fmt::Debug for MapperRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapperRegistration")
            .field("interface", &self.interface.name())
            .field("cached_methods", &self.methods.len())
            .finish()
    }
}
