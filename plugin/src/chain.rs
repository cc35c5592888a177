//! The interceptor chain.
//!
//! Interceptors are registered once at bootstrap through an
//! `InterceptorChainBuilder`. The built `InterceptorChain` is immutable and
//! cheap to clone, so any number of threads can wrap components with it.

use crate::{wrap, Interceptable, Interceptor, PluginError, PluginResult, SignatureMap};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// An interceptor together with its resolved signatures.
#[derive(Clone)]
pub struct RegisteredInterceptor {
    interceptor: Arc<dyn Interceptor>,
    signature_map: SignatureMap,
}

impl RegisteredInterceptor {
    /// Resolve an interceptor's signatures.
    ///
    /// Fails when the interceptor declares no signatures or names an operation
    /// that does not exist.
    pub fn new(interceptor: Arc<dyn Interceptor>) -> PluginResult<Self> {
        let signatures = interceptor.signatures();
        if signatures.is_empty() {
            return Err(PluginError::missing_signatures(interceptor.name()));
        }
        let signature_map = SignatureMap::resolve(&signatures)?;
        Ok(Self {
            interceptor,
            signature_map,
        })
    }

    /// The interceptor.
    pub fn interceptor(&self) -> &Arc<dyn Interceptor> {
        &self.interceptor
    }

    /// Resolved signatures, grouped by capability.
    pub fn signature_map(&self) -> &SignatureMap {
        &self.signature_map
    }

    /// Name used in diagnostics.
    pub fn name(&self) -> &str {
        self.interceptor.name()
    }

    /// Wrap a target with this interceptor alone.
    pub fn wrap<T: ?Sized + Interceptable>(&self, target: Arc<T>) -> Arc<T> {
        wrap(target, self)
    }
}

impl fmt::Debug for RegisteredInterceptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredInterceptor")
            .field("name", &self.name())
            .field("signature_map", &self.signature_map)
            .finish()
    }
}

/// Builder collecting interceptors in registration order.
#[derive(Debug, Default)]
pub struct InterceptorChainBuilder {
    interceptors: Vec<RegisteredInterceptor>,
}

impl InterceptorChainBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an interceptor.
    ///
    /// Signature errors are raised here, not on first use.
    pub fn add(&mut self, interceptor: Arc<dyn Interceptor>) -> PluginResult<&mut Self> {
        let registered = RegisteredInterceptor::new(interceptor)?;
        debug!(
            interceptor = registered.name(),
            position = self.interceptors.len(),
            "registered interceptor"
        );
        self.interceptors.push(registered);
        Ok(self)
    }

    /// Number of interceptors registered so far.
    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    /// Check if nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }

    /// Publish the chain. Its order is fixed from here on.
    pub fn build(self) -> InterceptorChain {
        InterceptorChain {
            interceptors: self.interceptors.into(),
        }
    }
}

/// Immutable, ordered list of interceptors.
#[derive(Debug, Clone, Default)]
pub struct InterceptorChain {
    interceptors: Arc<[RegisteredInterceptor]>,
}

impl InterceptorChain {
    /// Create an empty chain.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Wrap `target` with every interceptor in registration order.
    ///
    /// The last-registered interceptor ends up outermost: it sees a call first
    /// and post-processes it last.
    pub fn plugin_all<T: ?Sized + Interceptable>(&self, target: Arc<T>) -> Arc<T> {
        self.interceptors
            .iter()
            .fold(target, |target, interceptor| wrap(target, interceptor))
    }

    /// Registered interceptors, in registration order.
    pub fn interceptors(&self) -> &[RegisteredInterceptor] {
        &self.interceptors
    }

    /// Number of interceptors.
    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    /// Check if the chain is empty.
    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }
}
