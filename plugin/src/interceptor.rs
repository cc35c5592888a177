//! The interceptor contract.

use crate::{Invocation, Reply, Signature};
use kite_core::PersistenceResult;
use std::collections::BTreeMap;

/// Free-form settings handed to an interceptor at registration.
pub type Properties = BTreeMap<String, String>;

/// Cross-cutting decorator for internal components.
///
/// An interceptor declares which operations it wants to see through
/// `signatures`. Matching calls reach `intercept` as an `Invocation`; the
/// interceptor decides whether, and how often, to `proceed`.
pub trait Interceptor: Send + Sync {
    /// Operations this interceptor applies to. Must not be empty.
    fn signatures(&self) -> Vec<Signature>;

    /// Handle one intercepted call.
    fn intercept(&self, invocation: Invocation<'_>) -> PersistenceResult<Reply>;

    /// Receive configured properties before the interceptor is registered.
    fn set_properties(&mut self, _properties: &Properties) {}

    /// Name used in diagnostics.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}
