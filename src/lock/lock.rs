use super::LockError;

/// Trait for a single lock instance.
///
/// Implementations provide blocking lock, non-blocking try-lock, and unlock.
/// Every successful `lock` or `try_lock` must be paired with exactly one
/// `unlock` from the same caller; `LockGuard` does the pairing automatically.
pub trait Lock: Send + Sync {
    /// Acquire the lock, blocking until it becomes available.
    fn lock(&self) -> Result<(), LockError>;

    /// Try to acquire the lock without blocking.
    /// Returns `Ok(true)` if acquired, `Ok(false)` if held by someone else.
    fn try_lock(&self) -> Result<bool, LockError>;

    /// Release one acquisition of the lock.
    fn unlock(&self) -> Result<(), LockError>;
}
