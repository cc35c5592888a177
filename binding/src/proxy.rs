//! Live mapper clients.

use crate::{MapperOutput, MapperRegistration, MethodHandler};
use kite_core::{PersistenceResult, RowBounds, Value};
use kite_session::SessionRef;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

struct ProxyInner {
    registration: Arc<MapperRegistration>,
    session: SessionRef,
}

/// A mapper interface bound to a session.
///
/// Clones share identity: they compare equal and hash alike. Two proxies
/// obtained separately are distinct even when they serve the same interface
/// with the same session.
#[derive(Clone)]
pub struct MapperProxy {
    inner: Arc<ProxyInner>,
}

impl MapperProxy {
    pub fn new(registration: Arc<MapperRegistration>, session: SessionRef) -> Self {
        Self {
            inner: Arc::new(ProxyInner {
                registration,
                session,
            }),
        }
    }

    /// Name of the bound interface.
    pub fn interface_name(&self) -> &str {
        self.inner.registration.name()
    }

    pub fn registration(&self) -> &Arc<MapperRegistration> {
        &self.inner.registration
    }

    pub fn session(&self) -> &SessionRef {
        &self.inner.session
    }

    /// Call a mapper method.
    pub fn invoke(&self, method: &str, args: Vec<Value>) -> PersistenceResult<MapperOutput> {
        self.invoke_with_bounds(method, args, RowBounds::default())
    }

    /// Call a mapper method, limiting the rows a list, map or cursor read returns.
    ///
    /// Methods implemented by the interface run their own body and never
    /// reach the session. Errors raised by the session come back unchanged.
    pub fn invoke_with_bounds(
        &self,
        method: &str,
        args: Vec<Value>,
        bounds: RowBounds,
    ) -> PersistenceResult<MapperOutput> {
        let handler = self.inner.registration.handler(method)?;
        match handler.as_ref() {
            MethodHandler::Default(body) => body(self, args),
            MethodHandler::Statement(mapper_method) => {
                mapper_method.execute(self.inner.session.as_ref(), args, bounds)
            }
        }
    }
}

impl PartialEq for MapperProxy {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for MapperProxy {}

impl Hash for MapperProxy {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.inner).hash(state);
    }
}

impl fmt::Display for MapperProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MapperProxy({})", self.interface_name())
    }
}

impl fmt::Debug for MapperProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapperProxy")
            .field("interface", &self.interface_name())
            .finish()
    }
}
