//! One-shot transactional sessions.

use crate::{SessionOptions, SqlSession, SqlSessionFactory};
use kite_core::PersistenceResult;
use tracing::{debug, warn};

/// Run `call` inside a session opened for it alone.
///
/// The session is committed (non-forced) when `call` succeeds and rolled back
/// (non-forced) when it fails. It is closed on every path. The first failure
/// wins: a rollback or close failure after a failed call is logged and the
/// call's own error is returned.
pub fn run_auto_managed<T, F>(
    factory: &dyn SqlSessionFactory,
    operation: &str,
    call: F,
) -> PersistenceResult<T>
where
    F: FnOnce(&dyn SqlSession) -> PersistenceResult<T>,
{
    let session = factory.open_session(&SessionOptions::default())?;
    debug!(operation, "opened one-shot session");

    let outcome = call(session.as_ref()).and_then(|value| {
        session.commit(false)?;
        debug!(operation, "committed one-shot session");
        Ok(value)
    });

    let outcome = match outcome {
        Ok(value) => Ok(value),
        Err(err) => {
            match session.rollback(false) {
                Ok(()) => debug!(operation, error = %err, "rolled back one-shot session"),
                Err(rollback_err) => {
                    warn!(operation, error = %rollback_err, "rollback of one-shot session failed")
                }
            }
            Err(err)
        }
    };

    let closed = session.close();
    if closed.is_ok() {
        debug!(operation, "closed one-shot session");
    }
    match (outcome, closed) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(close_err)) => Err(close_err),
        (Err(err), Ok(())) => Err(err),
        (Err(err), Err(close_err)) => {
            warn!(operation, error = %close_err, "close of one-shot session failed");
            Err(err)
        }
    }
}
