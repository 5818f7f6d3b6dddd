//! A minimal spinlock for state shared between cooperative tasks.
//!
//! Narrower than the teacher's `IrqSpinLock`: nothing here is ever touched
//! from interrupt context (spawning a task only ever happens on the
//! scheduler thread, spec.md §5), so there is no IRQ masking to do — just
//! the CAS spin loop and a guard that unlocks on drop.

use core::cell::UnsafeCell;
use core::ops::{Deref, DerefMut};
use core::sync::atomic::{AtomicBool, Ordering};

/// A simple mutual-exclusion lock usable in `no_std`.
pub struct SpinLock<T> {
    locked: AtomicBool,
    value: UnsafeCell<T>,
}

// SAFETY: access to `value` is only ever granted through a `SpinLockGuard`
// obtained while `locked` is held, so concurrent access is serialized.
unsafe impl<T: Send> Sync for SpinLock<T> {}

impl<T> SpinLock<T> {
    /// Creates an unlocked spinlock wrapping `value`.
    pub const fn new(value: T) -> Self {
        Self {
            locked: AtomicBool::new(false),
            value: UnsafeCell::new(value),
        }
    }

    /// Spins until the lock is acquired, then returns a guard.
    pub fn lock(&self) -> SpinLockGuard<'_, T> {
        while self
            .locked
            .compare_exchange_weak(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            core::hint::spin_loop();
        }
        SpinLockGuard { lock: self }
    }
}

/// RAII guard releasing a [`SpinLock`] on drop.
pub struct SpinLockGuard<'a, T> {
    lock: &'a SpinLock<T>,
}

impl<T> Deref for SpinLockGuard<'_, T> {
    type Target = T;
    fn deref(&self) -> &T {
        // SAFETY: holding the guard means `locked` was successfully set.
        unsafe { &*self.lock.value.get() }
    }
}

impl<T> DerefMut for SpinLockGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        // SAFETY: see `Deref`.
        unsafe { &mut *self.lock.value.get() }
    }
}

impl<T> Drop for SpinLockGuard<'_, T> {
    fn drop(&mut self) {
        self.lock.locked.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::sync::Arc;
    use alloc::vec::Vec;

    #[test]
    fn guard_grants_exclusive_mutable_access() {
        let lock = SpinLock::new(0_u32);
        *lock.lock() += 1;
        *lock.lock() += 1;
        assert_eq!(*lock.lock(), 2);
    }

    #[test]
    fn lock_is_released_on_guard_drop() {
        let lock = Arc::new(SpinLock::new(Vec::<u32>::new()));
        {
            let mut g = lock.lock();
            g.push(1);
        }
        // If the prior guard's drop failed to release the lock, this would
        // spin forever.
        lock.lock().push(2);
        assert_eq!(*lock.lock(), alloc::vec![1, 2]);
    }
}
