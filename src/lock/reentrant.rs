use std::marker::PhantomData;
use std::sync::{Condvar, Mutex, MutexGuard};
use std::thread::{self, ThreadId};

use super::{Lock, LockError};

#[derive(Debug, Default)]
struct State {
    owner: Option<ThreadId>,
    count: usize,
}

/// Reentrant lock backed by `Mutex<State>` + `Condvar`.
///
/// The owning thread may re-acquire the lock any number of times; it is
/// released to other threads once every acquisition has been unlocked.
#[derive(Debug, Default)]
pub struct ReentrantLock {
    state: Mutex<State>,
    wake: Condvar,
}

impl ReentrantLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock and return a guard that releases it on drop.
    pub fn acquire(&self) -> Result<LockGuard<'_>, LockError> {
        self.lock()?;
        Ok(LockGuard {
            lock: self,
            _not_send: PhantomData,
        })
    }

    /// Acquire the lock without blocking. `Ok(None)` means another thread holds it.
    pub fn try_acquire(&self) -> Result<Option<LockGuard<'_>>, LockError> {
        if self.try_lock()? {
            Ok(Some(LockGuard {
                lock: self,
                _not_send: PhantomData,
            }))
        } else {
            Ok(None)
        }
    }

    pub fn is_locked(&self) -> Result<bool, LockError> {
        Ok(self.state()?.owner.is_some())
    }

    /// Number of outstanding acquisitions held by the calling thread.
    pub fn hold_count(&self) -> Result<usize, LockError> {
        let state = self.state()?;
        if state.owner == Some(thread::current().id()) {
            Ok(state.count)
        } else {
            Ok(0)
        }
    }

    fn state(&self) -> Result<MutexGuard<'_, State>, LockError> {
        self.state
            .lock()
            .map_err(|e| LockError::Poisoned(e.to_string()))
    }
}

impl Lock for ReentrantLock {
    fn lock(&self) -> Result<(), LockError> {
        let me = thread::current().id();
        let mut state = self.state()?;
        while state.owner.is_some_and(|owner| owner != me) {
            state = self
                .wake
                .wait(state)
                .map_err(|e| LockError::Poisoned(e.to_string()))?;
        }
        state.owner = Some(me);
        state.count += 1;
        Ok(())
    }

    fn try_lock(&self) -> Result<bool, LockError> {
        let me = thread::current().id();
        let mut state = self.state()?;
        match state.owner {
            Some(owner) if owner != me => Ok(false),
            _ => {
                state.owner = Some(me);
                state.count += 1;
                Ok(true)
            }
        }
    }

    fn unlock(&self) -> Result<(), LockError> {
        let me = thread::current().id();
        let mut state = self.state()?;
        if state.owner != Some(me) {
            return Err(LockError::NotOwner { owner: state.owner });
        }
        state.count -= 1;
        if state.count == 0 {
            state.owner = None;
            self.wake.notify_one();
        }
        Ok(())
    }
}

/// Scoped acquisition of a `ReentrantLock`.
///
/// Dropping the guard releases exactly one acquisition, including while
/// unwinding from a panic. The guard stays on the thread that acquired it.
#[must_use = "the lock is released as soon as the guard is dropped"]
pub struct LockGuard<'a> {
    lock: &'a ReentrantLock,
    _not_send: PhantomData<*const ()>,
}

impl Drop for LockGuard<'_> {
    fn drop(&mut self) {
        if let Err(err) = self.lock.unlock() {
            log::error!("event=lock_release status=error error={}", err);
        }
    }
}
