//! Signatures: declared identities of interceptable operations.

use crate::{Capability, PluginError, PluginResult};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// Shape of one operation parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamType {
    /// A `ConnectionRef`.
    Connection,
    /// An optional timeout in seconds.
    Timeout,
    /// A `PreparedStatement`.
    Statement,
    /// A raw `ResultSet`.
    ResultSet,
    /// A `MappedStatement`.
    MappedStatement,
    /// A parameter object (`Value`).
    Parameter,
    /// `RowBounds`.
    RowBounds,
    /// A boolean flag.
    Flag,
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParamType::Connection => "Connection",
            ParamType::Timeout => "Timeout",
            ParamType::Statement => "Statement",
            ParamType::ResultSet => "ResultSet",
            ParamType::MappedStatement => "MappedStatement",
            ParamType::Parameter => "Parameter",
            ParamType::RowBounds => "RowBounds",
            ParamType::Flag => "Flag",
        };
        f.write_str(name)
    }
}

/// One operation a capability contract declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodDescriptor {
    pub name: &'static str,
    pub params: &'static [ParamType],
}

/// Resolved identity of an interceptable operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Method {
    pub capability: Capability,
    pub name: &'static str,
}

impl Method {
    pub const fn new(capability: Capability, name: &'static str) -> Self {
        Self { capability, name }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.capability, self.name)
    }
}

/// Declared (capability, operation name, parameter shapes) triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    pub capability: Capability,
    pub method: String,
    pub params: Vec<ParamType>,
}

impl Signature {
    /// Create a signature.
    pub fn new(capability: Capability, method: impl Into<String>, params: &[ParamType]) -> Self {
        Self {
            capability,
            method: method.into(),
            params: params.to_vec(),
        }
    }

    /// Resolve against the capability's operation catalog.
    pub fn resolve(&self) -> PluginResult<Method> {
        self.capability
            .methods()
            .iter()
            .find(|descriptor| descriptor.name == self.method && descriptor.params == self.params)
            .map(|descriptor| Method::new(self.capability, descriptor.name))
            .ok_or_else(|| {
                PluginError::method_not_found(self.capability, &self.method, self.params.clone())
            })
    }
}

/// Resolved signatures of one interceptor, grouped by declaring capability.
#[derive(Debug, Clone, Default)]
pub struct SignatureMap {
    methods: HashMap<Capability, Arc<HashSet<Method>>>,
}

impl SignatureMap {
    /// Resolve every signature; the first unknown operation aborts.
    pub fn resolve(signatures: &[Signature]) -> PluginResult<Self> {
        let mut grouped: HashMap<Capability, HashSet<Method>> = HashMap::new();
        for signature in signatures {
            let method = signature.resolve()?;
            grouped.entry(signature.capability).or_default().insert(method);
        }
        Ok(Self {
            methods: grouped
                .into_iter()
                .map(|(capability, methods)| (capability, Arc::new(methods)))
                .collect(),
        })
    }

    /// Intercepted operations declared by a capability.
    pub fn methods_for(&self, capability: Capability) -> Option<&Arc<HashSet<Method>>> {
        self.methods.get(&capability)
    }

    /// Check whether an operation is intercepted.
    pub fn contains(&self, method: &Method) -> bool {
        self.methods
            .get(&method.capability)
            .is_some_and(|methods| methods.contains(method))
    }

    /// Capabilities keying this map.
    pub fn capabilities(&self) -> impl Iterator<Item = Capability> + '_ {
        self.methods.keys().copied()
    }

    /// Check whether no capability is referenced.
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}
