//! Fault-injecting allocator for exercising out-of-memory paths.

#![allow(unsafe_code, reason = "forwards the raw allocator contract")]

use std::alloc::Layout;
use std::cell::Cell;
use std::ptr::NonNull;

use crate::{AllocHandle, Allocator};

/// Allocator that forwards to an inner handle until a budget of successful
/// allocations is spent, then fails every request.
///
/// `realloc` and `zalloc` draw from the same budget as `alloc`. `free` is
/// always forwarded.
///
/// Tests keep an `Rc<FaultyAlloc>` and wrap a clone in an [`AllocHandle`],
/// so the budget can be inspected or refilled while the handle is in use.
#[derive(Debug)]
pub struct FaultyAlloc {
    inner: AllocHandle,
    remaining: Cell<Option<usize>>,
    failures: Cell<usize>,
    successes: Cell<usize>,
}

impl FaultyAlloc {
    /// Succeed `successes` times, then fail.
    pub fn fail_after(inner: AllocHandle, successes: usize) -> Self {
        FaultyAlloc {
            inner,
            remaining: Cell::new(Some(successes)),
            failures: Cell::new(0),
            successes: Cell::new(0),
        }
    }

    /// Never fail.
    pub fn unlimited(inner: AllocHandle) -> Self {
        FaultyAlloc {
            inner,
            remaining: Cell::new(None),
            failures: Cell::new(0),
            successes: Cell::new(0),
        }
    }

    /// Replace the remaining budget. `None` disables failures.
    pub fn set_budget(&self, successes: Option<usize>) {
        self.remaining.set(successes);
    }

    /// Number of requests refused so far.
    pub fn failures(&self) -> usize {
        self.failures.get()
    }

    /// Number of requests forwarded so far.
    pub fn successes(&self) -> usize {
        self.successes.get()
    }

    fn take(&self) -> bool {
        match self.remaining.get() {
            None => {}
            Some(0) => {
                self.failures.set(self.failures.get() + 1);
                return false;
            }
            Some(n) => self.remaining.set(Some(n - 1)),
        }
        self.successes.set(self.successes.get() + 1);
        true
    }
}

// SAFETY: successful calls forward to `inner` unchanged.
unsafe impl Allocator for FaultyAlloc {
    fn alloc(&self, layout: Layout) -> Option<NonNull<u8>> {
        if !self.take() {
            return None;
        }
        self.inner.alloc(layout)
    }

    unsafe fn free(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: forwarded from the caller; every block came from `inner`.
        unsafe { self.inner.free(ptr, layout) }
    }

    unsafe fn realloc(&self, ptr: NonNull<u8>, old: Layout, new: Layout) -> Option<NonNull<u8>> {
        if !self.take() {
            return None;
        }
        // SAFETY: forwarded from the caller; every block came from `inner`.
        unsafe { self.inner.realloc(ptr, old, new) }
    }

    fn zalloc(&self, layout: Layout) -> Option<NonNull<u8>> {
        if !self.take() {
            return None;
        }
        self.inner.zalloc(layout)
    }
}
