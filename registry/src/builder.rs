//! RegistryBuilder for constructing an immutable Registry.

use crate::{Registry, RegistryError, RegistryResult, Settings};
use kite_binding::{MappedStatements, MapperInterface, MapperRegistry};
use kite_core::{is_valid_statement_id, MappedStatement, SqlCommandType};
use kite_plugin::{Interceptor, InterceptorChainBuilder, Properties};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Builder for constructing an immutable Registry.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    /// Statements by id.
    statements: HashMap<String, MappedStatement>,
    /// Mapper interfaces, validated at build.
    mappers: Vec<MapperInterface>,
    /// Interceptors in registration order.
    interceptors: InterceptorChainBuilder,
    settings: Settings,
}

impl RegistryBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a mapped statement.
    pub fn add_statement(
        &mut self,
        id: impl Into<String>,
        command_type: SqlCommandType,
    ) -> StatementBuilder<'_> {
        StatementBuilder {
            builder: self,
            id: id.into(),
            command_type,
            sql: String::new(),
            timeout: None,
        }
    }

    /// Add a mapper interface.
    pub fn add_mapper(&mut self, interface: MapperInterface) -> &mut Self {
        self.mappers.push(interface);
        self
    }

    /// Register an interceptor. Later registrations wrap earlier ones.
    pub fn add_interceptor(&mut self, interceptor: Arc<dyn Interceptor>) -> RegistryResult<&mut Self> {
        self.interceptors.add(interceptor)?;
        Ok(self)
    }

    /// Configure an interceptor with `properties`, then register it.
    pub fn add_interceptor_with_properties<I>(
        &mut self,
        mut interceptor: I,
        properties: &Properties,
    ) -> RegistryResult<&mut Self>
    where
        I: Interceptor + 'static,
    {
        interceptor.set_properties(properties);
        self.add_interceptor(Arc::new(interceptor))
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Build the immutable Registry.
    pub fn build(self) -> RegistryResult<Registry> {
        let default_timeout = self.settings.default_statement_timeout;
        let mut statements = MappedStatements::new();
        for (_, mut statement) in self.statements {
            if statement.timeout.is_none() {
                statement.timeout = default_timeout;
            }
            statements.insert(statement);
        }
        let statements = Arc::new(statements);

        let mut mappers = MapperRegistry::new(statements.clone());
        for interface in self.mappers {
            mappers.add_mapper(interface)?;
        }

        let interceptors = self.interceptors.build();
        debug!(
            statements = statements.len(),
            mappers = mappers.len(),
            interceptors = interceptors.len(),
            "registry built"
        );

        Ok(Registry::new(statements, mappers, interceptors, self.settings))
    }
}

/// Builder for a mapped statement.
pub struct StatementBuilder<'a> {
    builder: &'a mut RegistryBuilder,
    id: String,
    command_type: SqlCommandType,
    sql: String,
    timeout: Option<u32>,
}

impl<'a> StatementBuilder<'a> {
    /// Set the statement text.
    pub fn sql(mut self, sql: impl Into<String>) -> Self {
        self.sql = sql.into();
        self
    }

    /// Set the query timeout in seconds.
    pub fn timeout(mut self, seconds: u32) -> Self {
        self.timeout = Some(seconds);
        self
    }

    /// Finish building this statement.
    pub fn done(self) -> RegistryResult<()> {
        if !is_valid_statement_id(&self.id) {
            return Err(RegistryError::InvalidStatementId(self.id));
        }
        if self.builder.statements.contains_key(&self.id) {
            return Err(RegistryError::DuplicateStatement(self.id));
        }

        let mut statement = MappedStatement::new(self.id.clone(), self.command_type, self.sql);
        statement.timeout = self.timeout;
        self.builder.statements.insert(self.id, statement);
        Ok(())
    }
}
