//! Known mapper interfaces.

use crate::{
    BindingError, BindingResult, MapperInterface, MapperMethod, MapperProxy, MapperRegistration,
    StatementCatalog,
};
use kite_session::SessionRef;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

/// Registrations keyed by interface name.
pub struct MapperRegistry {
    catalog: Arc<dyn StatementCatalog>,
    mappers: HashMap<String, Arc<MapperRegistration>>,
}

impl MapperRegistry {
    pub fn new(catalog: Arc<dyn StatementCatalog>) -> Self {
        Self {
            catalog,
            mappers: HashMap::new(),
        }
    }

    /// Register an interface.
    ///
    /// Every method without a default body is resolved now, so a missing
    /// statement or an impossible return shape fails here rather than on the
    /// first call. Resolved methods are not cached yet.
    pub fn add_mapper(&mut self, interface: MapperInterface) -> BindingResult<()> {
        let name = interface.name().to_string();
        if self.mappers.contains_key(&name) {
            return Err(BindingError::DuplicateMapper(name));
        }

        let mut seen = HashSet::new();
        for method in interface.methods() {
            if !seen.insert(method.name.as_str()) {
                return Err(BindingError::DuplicateMethod {
                    mapper: name,
                    method: method.name.clone(),
                });
            }
            let mut params = HashSet::new();
            if let Some(param) = method.params.iter().find(|p| !params.insert(p.as_str())) {
                return Err(BindingError::DuplicateParameter {
                    mapper: name,
                    method: method.name.clone(),
                    param: param.clone(),
                });
            }
            if !method.has_default_body() {
                MapperMethod::resolve(&name, method, self.catalog.as_ref())?;
            }
        }

        debug!(mapper = %name, methods = interface.methods().len(), "registered mapper");
        let registration = MapperRegistration::new(interface, Arc::clone(&self.catalog));
        self.mappers.insert(name, Arc::new(registration));
        Ok(())
    }

    pub fn has_mapper(&self, name: &str) -> bool {
        self.mappers.contains_key(name)
    }

    pub fn registration(&self, name: &str) -> Option<&Arc<MapperRegistration>> {
        self.mappers.get(name)
    }

    /// Bind a registered interface to `session`.
    pub fn get_mapper(&self, name: &str, session: SessionRef) -> BindingResult<MapperProxy> {
        let registration = self
            .mappers
            .get(name)
            .ok_or_else(|| BindingError::UnknownMapper(name.to_string()))?;
        Ok(MapperProxy::new(Arc::clone(registration), session))
    }

    /// Names of registered interfaces.
    pub fn mapper_names(&self) -> impl Iterator<Item = &str> {
        self.mappers.keys().map(|name| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.mappers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappers.is_empty()
    }
}

impl std::fmt::Debug for MapperRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapperRegistry")
            .field("mappers", &self.mappers.keys().collect::<Vec<_>>())
            .finish()
    }
}
