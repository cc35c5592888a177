//! The immutable Registry.

use crate::Settings;
use kite_binding::{BindingResult, MappedStatements, MapperProxy, MapperRegistry};
use kite_core::MappedStatement;
use kite_plugin::{Executor, InterceptorChain, ParameterHandler, ResultSetHandler, StatementHandler};
use kite_session::{SessionManager, SessionOptions, SessionRef, SqlSessionFactory};
use std::sync::Arc;

/// The immutable Registry containing all runtime configuration.
#[derive(Debug)]
pub struct Registry {
    statements: Arc<MappedStatements>,
    mappers: MapperRegistry,
    interceptors: InterceptorChain,
    settings: Settings,
}

impl Registry {
    /// Create a new registry (called by RegistryBuilder).
    pub(crate) fn new(
        statements: Arc<MappedStatements>,
        mappers: MapperRegistry,
        interceptors: InterceptorChain,
        settings: Settings,
    ) -> Self {
        Self {
            statements,
            mappers,
            interceptors,
            settings,
        }
    }

    // ==================== Statement Queries ====================

    /// Get a mapped statement by id.
    pub fn mapped_statement(&self, id: &str) -> Option<Arc<MappedStatement>> {
        self.statements.get(id).cloned()
    }

    /// Check if a statement is declared.
    pub fn has_statement(&self, id: &str) -> bool {
        self.statements.contains(id)
    }

    pub fn statements(&self) -> &Arc<MappedStatements> {
        &self.statements
    }

    // ==================== Mapper Queries ====================

    /// Bind a registered mapper interface to `session`.
    pub fn get_mapper(&self, name: &str, session: SessionRef) -> BindingResult<MapperProxy> {
        self.mappers.get_mapper(name, session)
    }

    pub fn has_mapper(&self, name: &str) -> bool {
        self.mappers.has_mapper(name)
    }

    pub fn mappers(&self) -> &MapperRegistry {
        &self.mappers
    }

    // ==================== Components ====================

    /// The published interceptor chain.
    pub fn interceptors(&self) -> &InterceptorChain {
        &self.interceptors
    }

    /// Run a new executor through the interceptor chain.
    pub fn new_executor(&self, executor: Arc<dyn Executor>) -> Arc<dyn Executor> {
        self.interceptors.plugin_all(executor)
    }

    /// Run a new statement handler through the interceptor chain.
    pub fn new_statement_handler(
        &self,
        handler: Arc<dyn StatementHandler>,
    ) -> Arc<dyn StatementHandler> {
        self.interceptors.plugin_all(handler)
    }

    /// Run a new parameter handler through the interceptor chain.
    pub fn new_parameter_handler(
        &self,
        handler: Arc<dyn ParameterHandler>,
    ) -> Arc<dyn ParameterHandler> {
        self.interceptors.plugin_all(handler)
    }

    /// Run a new result set handler through the interceptor chain.
    pub fn new_result_set_handler(
        &self,
        handler: Arc<dyn ResultSetHandler>,
    ) -> Arc<dyn ResultSetHandler> {
        self.interceptors.plugin_all(handler)
    }

    // ==================== Sessions ====================

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Options for a session opened with the configured defaults.
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions::new().with_executor_type(self.settings.default_executor_type)
    }

    /// A session manager over `factory`, using the configured unmanaged policy.
    pub fn session_manager(&self, factory: Arc<dyn SqlSessionFactory>) -> SessionManager {
        SessionManager::new(factory).with_unmanaged_policy(self.settings.unmanaged_policy)
    }
}
