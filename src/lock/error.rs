use std::thread::ThreadId;

use thiserror::Error;

/// Error type for lock operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LockError {
    /// The underlying lock primitive was poisoned (e.g. a thread panicked while holding it).
    #[error("lock poisoned: {0}")]
    Poisoned(String),
    /// `unlock` was called by a thread that does not hold the lock.
    #[error("lock not held by caller (owner: {owner:?})")]
    NotOwner { owner: Option<ThreadId> },
}
