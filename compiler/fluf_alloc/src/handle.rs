//! The allocator capability and its shared handle.

#![allow(
    unsafe_code,
    reason = "allocator contract is expressed over raw pointers"
)]

use std::alloc::Layout;
use std::fmt;
use std::ops::Deref;
use std::ptr::NonNull;
use std::rc::Rc;

use crate::{AllocError, SystemAlloc};

/// Raw allocation capability.
///
/// Implementations hand out untyped memory blocks described by a
/// [`Layout`]. `None` means out of memory. A zero-sized request must return
/// a non-null, suitably aligned sentinel (see [`crate::dangling`]).
///
/// Methods take `&self`; stateful allocators use interior mutability. This
/// is what lets one allocator be shared through an [`AllocHandle`].
///
/// # Safety
///
/// Callers write through returned pointers without further checks, so an
/// implementation must uphold all of the following:
///
/// - A `Some(ptr)` from `alloc`, `zalloc` or `realloc` points to at least
///   `layout.size()` writable bytes aligned to `layout.align()`, not
///   overlapping any other live block.
/// - The block stays valid until it is passed to `free` or a successful
///   `realloc`, or until the allocator itself is dropped.
/// - For a zero-sized layout the pointer is non-null and aligned, and is
///   never dereferenced by callers.
/// - `zalloc` returns zeroed memory, and `realloc` preserves the first
///   `min(old.size(), new.size())` bytes.
/// - A failed `realloc` leaves the old block untouched and valid.
///
/// ```compile_fail
/// use std::alloc::Layout;
/// use std::ptr::NonNull;
///
/// use fluf_alloc::Allocator;
///
/// static ONE: [u8; 1] = [0];
///
/// struct Liar;
///
/// impl Allocator for Liar {
///     fn alloc(&self, _layout: Layout) -> Option<NonNull<u8>> {
///         Some(NonNull::from(&ONE).cast())
///     }
///     unsafe fn free(&self, _ptr: NonNull<u8>, _layout: Layout) {}
/// }
/// ```
pub unsafe trait Allocator {
    /// Allocate a block of at least `layout.size()` bytes aligned to
    /// `layout.align()`.
    fn alloc(&self, layout: Layout) -> Option<NonNull<u8>>;

    /// Release a block.
    ///
    /// # Safety
    ///
    /// `ptr` must have been returned by this allocator for `layout` and must
    /// not have been freed already.
    unsafe fn free(&self, ptr: NonNull<u8>, layout: Layout);

    /// Resize a block, preserving `min(old.size(), new.size())` bytes.
    ///
    /// On failure returns `None` and the old block stays valid.
    ///
    /// # Safety
    ///
    /// `ptr` must be a live block from this allocator allocated with `old`.
    /// On success `ptr` must be treated as freed (it may equal the result).
    unsafe fn realloc(&self, ptr: NonNull<u8>, old: Layout, new: Layout) -> Option<NonNull<u8>> {
        // SAFETY: forwarded from the caller.
        unsafe { realloc_by_copy(self, ptr, old, new) }
    }

    /// Allocate a zero-filled block.
    fn zalloc(&self, layout: Layout) -> Option<NonNull<u8>> {
        let ptr = self.alloc(layout)?;
        // SAFETY: `alloc` returned at least `layout.size()` writable bytes.
        unsafe { std::ptr::write_bytes(ptr.as_ptr(), 0, layout.size()) };
        Some(ptr)
    }
}

/// Generic reallocation: allocate, copy, free.
///
/// # Safety
///
/// Same contract as [`Allocator::realloc`].
pub unsafe fn realloc_by_copy<A: Allocator + ?Sized>(
    alloc: &A,
    ptr: NonNull<u8>,
    old: Layout,
    new: Layout,
) -> Option<NonNull<u8>> {
    let new_ptr = alloc.alloc(new)?;
    let preserved = old.size().min(new.size());
    // SAFETY: both blocks are live, distinct, and at least `preserved` bytes.
    unsafe {
        std::ptr::copy_nonoverlapping(ptr.as_ptr(), new_ptr.as_ptr(), preserved);
        alloc.free(ptr, old);
    }
    Some(new_ptr)
}

// SAFETY: every method forwards to the wrapped allocator.
unsafe impl<A: Allocator + ?Sized> Allocator for Rc<A> {
    #[inline]
    fn alloc(&self, layout: Layout) -> Option<NonNull<u8>> {
        (**self).alloc(layout)
    }

    #[inline]
    unsafe fn free(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: forwarded from the caller.
        unsafe { (**self).free(ptr, layout) }
    }

    #[inline]
    unsafe fn realloc(&self, ptr: NonNull<u8>, old: Layout, new: Layout) -> Option<NonNull<u8>> {
        // SAFETY: forwarded from the caller.
        unsafe { (**self).realloc(ptr, old, new) }
    }

    #[inline]
    fn zalloc(&self, layout: Layout) -> Option<NonNull<u8>> {
        (**self).zalloc(layout)
    }
}

/// Shared handle to an allocator.
///
/// Cloning is cheap (a reference count bump). Every consumer that owns
/// memory keeps a clone of the handle it allocated from, so the allocator
/// always outlives the memory it handed out.
///
/// # When to Use Which Backend
///
/// - [`AllocHandle::system`] for memory that is freed piecemeal (builders,
///   growable buffers).
/// - `AllocHandle::new(Bump::new(..))` when everything allocated through the
///   handle can be released together.
#[derive(Clone)]
pub struct AllocHandle(Rc<dyn Allocator>);

impl AllocHandle {
    /// Wrap an allocator in a new handle.
    pub fn new<A: Allocator + 'static>(alloc: A) -> Self {
        AllocHandle(Rc::new(alloc))
    }

    /// Handle to the process heap.
    pub fn system() -> Self {
        Self::new(SystemAlloc)
    }

    /// Allocate, converting a null result into [`AllocError`].
    #[inline]
    pub fn try_alloc(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        self.0
            .alloc(layout)
            .ok_or_else(|| AllocError::out_of_memory(layout))
    }
}

impl Default for AllocHandle {
    fn default() -> Self {
        Self::system()
    }
}

impl Deref for AllocHandle {
    type Target = dyn Allocator;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}

impl fmt::Debug for AllocHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AllocHandle({:p})", Rc::as_ptr(&self.0).cast::<()>())
    }
}
