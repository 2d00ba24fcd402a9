// SPDX-License-Identifier: MPL-2.0

//! The per-handler reentrancy guard.

use core::sync::atomic::{AtomicBool, Ordering};

/// A binary flag that keeps a handler from running inside itself.
///
/// A nested interrupt may fire the same vector while a previous invocation of
/// the handler is still in flight. The nested invocation finds the guard held
/// and must abandon its work immediately: [`try_enter`] never spins and never
/// queues.
///
/// This is not a lock for concurrent threads. The only contender is the
/// handler itself, one interrupt level deeper, on the same CPU.
///
/// [`try_enter`]: Self::try_enter
#[derive(Debug)]
pub struct ReentrancyGuard {
    held: AtomicBool,
}

impl ReentrancyGuard {
    /// Creates a free guard.
    pub const fn new() -> Self {
        Self {
            held: AtomicBool::new(false),
        }
    }

    /// Takes the guard if it is free.
    ///
    /// Returns `None`, without touching the guard, if it is already held.
    pub fn try_enter(&self) -> Option<GuardToken<'_>> {
        self.held
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| GuardToken { guard: self })
    }

    /// Returns whether an invocation currently holds the guard.
    pub fn is_held(&self) -> bool {
        self.held.load(Ordering::Relaxed)
    }
}

impl Default for ReentrancyGuard {
    fn default() -> Self {
        Self::new()
    }
}

/// Proof of holding a [`ReentrancyGuard`]. The guard is freed on drop.
#[clippy::has_significant_drop]
#[must_use]
#[derive(Debug)]
pub struct GuardToken<'a> {
    guard: &'a ReentrancyGuard,
}

impl Drop for GuardToken<'_> {
    fn drop(&mut self) {
        self.guard.held.store(false, Ordering::Release);
    }
}
