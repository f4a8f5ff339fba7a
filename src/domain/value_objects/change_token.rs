//! Change Token Value Object
//!
//! A cheap, clonable flag shared between a path monitor and whoever
//! computed something from the watched path. Once invalidated it stays
//! invalid; a fresh token is issued on the next rebuild.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

#[derive(Debug, Clone)]
pub struct ChangeToken {
    path: String,
    current: Arc<AtomicBool>,
}

impl ChangeToken {
    /// New token for a virtual path, initially current
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            current: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Virtual path this token watches
    pub fn path(&self) -> &str {
        &self.path
    }

    /// False once the watched path has changed
    pub fn is_current(&self) -> bool {
        self.current.load(Ordering::SeqCst)
    }

    pub fn invalidate(&self) {
        self.current.store(false, Ordering::SeqCst);
    }

    /// Handle that does not keep the token alive
    pub fn downgrade(&self) -> WeakChangeToken {
        WeakChangeToken {
            path: self.path.clone(),
            current: Arc::downgrade(&self.current),
        }
    }
}

/// Non-owning side of a `ChangeToken`, held by monitors
///
/// Once every `ChangeToken` clone is dropped nobody can observe an
/// invalidation any more and the handle is dead.
#[derive(Debug, Clone)]
pub struct WeakChangeToken {
    path: String,
    current: Weak<AtomicBool>,
}

impl WeakChangeToken {
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_alive(&self) -> bool {
        self.current.strong_count() > 0
    }

    pub fn upgrade(&self) -> Option<ChangeToken> {
        self.current.upgrade().map(|current| ChangeToken {
            path: self.path.clone(),
            current,
        })
    }
}
