//! Debug-only reentrancy guard for lock stripes.
//!
//! Remembers which thread is inside a critical section. In debug builds a
//! thread that tries to lock a section it already holds panics instead of
//! deadlocking on the mutex. In release builds this compiles to a no-op.

#[cfg(not(debug_assertions))]
use core::marker::PhantomData;
#[cfg(debug_assertions)]
use core::sync::atomic::{AtomicU64, Ordering};

#[cfg(debug_assertions)]
const NOBODY: u64 = 0;

/// Small per-process id for the calling thread; never `NOBODY`.
#[cfg(debug_assertions)]
fn current_thread() -> u64 {
    static NEXT: AtomicU64 = AtomicU64::new(1);
    std::thread_local! {
        static ID: u64 = NEXT.fetch_add(1, Ordering::Relaxed);
    }
    ID.with(|id| *id)
}

/// Per-instance holder tracker. Call `assert_not_held` before taking the
/// lock and keep the guard from `enter` alive for as long as the lock is
/// held.
#[derive(Debug)]
pub struct DebugReentrancy {
    // Only the holding thread writes its own id, so relaxed loads suffice
    // to tell "me" from "someone else".
    #[cfg(debug_assertions)]
    holder: AtomicU64,
}

impl DebugReentrancy {
    pub const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            holder: AtomicU64::new(NOBODY),
        }
    }

    /// In debug builds, panics if the calling thread already holds this
    /// section.
    #[inline]
    pub fn assert_not_held(&self) {
        #[cfg(debug_assertions)]
        assert!(
            self.holder.load(Ordering::Relaxed) != current_thread(),
            "reentrancy detected: thread already holds this lock"
        );
    }

    /// Mark the calling thread as holder. Only call with the lock held.
    #[inline]
    pub fn enter(&self) -> ReentrancyGuard<'_> {
        #[cfg(debug_assertions)]
        {
            self.holder.store(current_thread(), Ordering::Relaxed);
            return ReentrancyGuard { owner: self };
        }

        #[cfg(not(debug_assertions))]
        {
            return ReentrancyGuard { _z: PhantomData };
        }
    }
}

impl Default for DebugReentrancy {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII guard returned by `DebugReentrancy::enter`. Must be dropped before
/// the lock it shadows is released.
pub struct ReentrancyGuard<'a> {
    #[cfg(debug_assertions)]
    owner: &'a DebugReentrancy,
    #[cfg(not(debug_assertions))]
    _z: PhantomData<&'a ()>,
}

impl Drop for ReentrancyGuard<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        self.owner.holder.store(NOBODY, Ordering::Relaxed);
    }
}
