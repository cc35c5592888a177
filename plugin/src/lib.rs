//! Kite Plugin
//!
//! Interception chain for internal components.
//!
//! Responsibilities:
//! - Define the interceptable capability contracts (statement handler,
//!   parameter handler, result set handler, executor)
//! - Resolve interceptor signatures against the capability catalog at bootstrap
//! - Wrap targets in `Plugin` decorators, last-registered outermost
//! - Route intercepted calls through `Interceptor::intercept`, everything else
//!   straight to the target

mod call;
mod capability;
mod chain;
mod error;
mod interceptor;
mod invocation;
mod plugin;
mod signature;

pub use call::{Call, ExecutorCall, ParameterCall, Reply, ResultSetCall, StatementCall};
pub use capability::{
    Capability, Executor, Interceptable, ParameterHandler, ResultSetHandler, StatementHandler,
};
pub use chain::{InterceptorChain, InterceptorChainBuilder, RegisteredInterceptor};
pub use error::{PluginError, PluginResult};
pub use interceptor::{Interceptor, Properties};
pub use invocation::{Invocation, InvocationTarget};
pub use plugin::{wrap, Plugin};
pub use signature::{Method, MethodDescriptor, ParamType, Signature, SignatureMap};
