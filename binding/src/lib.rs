//! Kite Binding
//!
//! Turns a declared mapper interface plus a session into a live client.
//!
//! A `MapperInterface` is a namespace and a list of method declarations. The
//! `MapperRegistry` validates each interface once against the statement
//! catalog and keeps one `MapperRegistration` per interface. Every
//! `MapperProxy` handed out for that interface shares the registration's
//! method cache, so a method is resolved to its statement and execution mode
//! once and reused from then on.

mod catalog;
mod error;
mod interface;
mod method;
mod output;
mod proxy;
mod registration;
mod registry;

pub use catalog::{MappedStatements, StatementCatalog};
pub use error::{BindingError, BindingResult};
pub use interface::{DefaultBody, MapperInterface, MethodDecl, ReturnKind};
pub use method::{ExecutionMode, MapperMethod, RowCountReturn};
pub use output::MapperOutput;
pub use proxy::MapperProxy;
pub use registration::{MapperRegistration, MethodHandler};
pub use registry::MapperRegistry;
