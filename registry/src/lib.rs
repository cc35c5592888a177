//! Kite Registry
//!
//! Bootstrap for a Kite runtime.
//!
//! A `RegistryBuilder` collects mapped statements, mapper interfaces,
//! interceptors and settings. `build()` validates everything and publishes an
//! immutable `Registry`, which then hands out mappers, session managers and
//! intercepted execution components to any number of threads.
//! `RegistrySessionFactory` opens sessions that resolve statement ids through
//! the registry and run them on an intercepted executor.

mod builder;
mod error;
mod registry;
mod session;
mod settings;

pub use builder::{RegistryBuilder, StatementBuilder};
pub use error::{RegistryError, RegistryResult};
pub use registry::Registry;
pub use session::{ExecutorHandle, ExecutorSession, ExecutorSource, RegistrySessionFactory};
pub use settings::Settings;
