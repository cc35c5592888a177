//! Per-thread managed-session slots.
//!
//! Each `SessionSlot` owns one entry in a thread-local map, so two managers
//! on the same thread never see each other's sessions and a session started
//! on one thread is invisible to every other thread.

use crate::SessionRef;
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SLOT_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static MANAGED: RefCell<HashMap<u64, SessionRef>> = RefCell::new(HashMap::new());
}

/// A handle to one thread-local session entry.
#[derive(Debug)]
pub(crate) struct SessionSlot {
    id: u64,
}

impl SessionSlot {
    pub(crate) fn new() -> Self {
        Self {
            id: NEXT_SLOT_ID.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// The session bound to the current thread, if any.
    ///
    /// The handle is cloned out so no borrow of the map is held while the
    /// caller runs the session.
    pub(crate) fn get(&self) -> Option<SessionRef> {
        MANAGED.with(|slots| slots.borrow().get(&self.id).cloned())
    }

    /// Bind `session` to the current thread, returning the previous one.
    pub(crate) fn replace(&self, session: SessionRef) -> Option<SessionRef> {
        MANAGED.with(|slots| slots.borrow_mut().insert(self.id, session))
    }

    /// Unbind and return the current thread's session.
    pub(crate) fn take(&self) -> Option<SessionRef> {
        // try_with: the thread-local may already be gone during thread teardown
        MANAGED
            .try_with(|slots| slots.borrow_mut().remove(&self.id))
            .ok()
            .flatten()
    }

    pub(crate) fn is_occupied(&self) -> bool {
        MANAGED.with(|slots| slots.borrow().contains_key(&self.id))
    }
}
