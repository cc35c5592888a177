//! Kite Session
//!
//! Session contracts and managed-session lifecycle.
//!
//! Responsibilities:
//! - Define the session client surface (`SqlSession`) and how sessions are
//!   opened (`SqlSessionFactory`, `SessionOptions`)
//! - Hold at most one managed session per thread per `SessionManager`
//! - Run unmanaged calls in one-shot auto-committing sessions
//! - Reject transaction-only operations when no managed session is started

mod factory;
mod manager;
mod session;
mod slot;
mod transaction;


pub use factory::{SessionOptions, SqlSessionFactory};
pub use manager::{SessionManager, UnmanagedPolicy};
pub use session::{KeyedRows, ResultHandler, SessionRef, SqlSession};
pub use transaction::run_auto_managed;
