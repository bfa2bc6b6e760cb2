//! Process heap backend.

#![allow(unsafe_code, reason = "thin wrapper over std::alloc")]

use std::alloc::Layout;
use std::ptr::NonNull;

use crate::{dangling, realloc_by_copy, Allocator};

/// Allocator backed by the global Rust heap.
///
/// Stateless; every instance is interchangeable.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemAlloc;

// SAFETY: blocks come straight from `std::alloc` for the requested layout;
// zero-sized requests get an aligned dangling pointer.
unsafe impl Allocator for SystemAlloc {
    #[inline]
    fn alloc(&self, layout: Layout) -> Option<NonNull<u8>> {
        if layout.size() == 0 {
            return Some(dangling(layout.align()));
        }
        // SAFETY: the layout has a non-zero size.
        NonNull::new(unsafe { std::alloc::alloc(layout) })
    }

    #[inline]
    unsafe fn free(&self, ptr: NonNull<u8>, layout: Layout) {
        if layout.size() == 0 {
            return;
        }
        // SAFETY: the caller guarantees `ptr` came from `alloc(layout)`.
        unsafe { std::alloc::dealloc(ptr.as_ptr(), layout) }
    }

    unsafe fn realloc(&self, ptr: NonNull<u8>, old: Layout, new: Layout) -> Option<NonNull<u8>> {
        if old.size() == 0 {
            return self.alloc(new);
        }
        if new.size() == 0 {
            // SAFETY: `ptr` is a live non-empty block for `old`.
            unsafe { self.free(ptr, old) };
            return Some(dangling(new.align()));
        }
        if old.align() != new.align() {
            // std::alloc::realloc keeps the original alignment.
            // SAFETY: forwarded from the caller.
            return unsafe { realloc_by_copy(self, ptr, old, new) };
        }
        // SAFETY: `ptr` is live for `old`; `new` is a valid layout with the
        // same alignment, so `new.size()` rounded up cannot overflow isize.
        NonNull::new(unsafe { std::alloc::realloc(ptr.as_ptr(), old, new.size()) })
    }

    #[inline]
    fn zalloc(&self, layout: Layout) -> Option<NonNull<u8>> {
        if layout.size() == 0 {
            return Some(dangling(layout.align()));
        }
        // SAFETY: the layout has a non-zero size.
        NonNull::new(unsafe { std::alloc::alloc_zeroed(layout) })
    }
}
