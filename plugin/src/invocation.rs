//! Captured invocations.

use crate::{Call, Interceptable, Method, Reply};
use kite_core::PersistenceResult;
use std::sync::Arc;

/// Something a captured call can be proceeded against.
pub trait InvocationTarget: Send + Sync {
    /// Perform the call on the wrapped component.
    fn invoke(&self, call: Call) -> PersistenceResult<Reply>;

    /// Concrete type name of the wrapped component.
    fn target_name(&self) -> &'static str;
}

impl<T: ?Sized + Interceptable> InvocationTarget for Arc<T> {
    fn invoke(&self, call: Call) -> PersistenceResult<Reply> {
        Interceptable::dispatch(&**self, call)
    }

    fn target_name(&self) -> &'static str {
        Interceptable::target_name(&**self)
    }
}

/// One intercepted call: the target, the operation and its arguments.
pub struct Invocation<'a> {
    target: &'a dyn InvocationTarget,
    call: Call,
}

impl<'a> Invocation<'a> {
    /// Capture a call against a target.
    pub fn new(target: &'a dyn InvocationTarget, call: Call) -> Self {
        Self { target, call }
    }

    /// Type name of the component being called.
    pub fn target_name(&self) -> &'static str {
        self.target.target_name()
    }

    /// The invoked operation.
    pub fn method(&self) -> Method {
        self.call.method()
    }

    /// The captured arguments.
    pub fn call(&self) -> &Call {
        &self.call
    }

    /// Mutable access to the arguments, for rewriting before `proceed`.
    pub fn call_mut(&mut self) -> &mut Call {
        &mut self.call
    }

    /// Perform the original call with the current arguments.
    ///
    /// May be called any number of times; each call reaches the target once.
    pub fn proceed(&self) -> PersistenceResult<Reply> {
        self.target.invoke(self.call.clone())
    }

    /// Consume the invocation, performing the original call.
    pub fn into_proceed(self) -> PersistenceResult<Reply> {
        self.target.invoke(self.call)
    }
}
