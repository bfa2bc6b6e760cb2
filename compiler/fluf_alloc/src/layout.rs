//! Checked size arithmetic and layout helpers.
//!
//! All capacity math in fluf goes through these helpers so that an
//! overflowing computation surfaces as [`AllocError::Overflow`] instead of
//! wrapping.

use std::alloc::Layout;
use std::ptr::NonNull;

use crate::AllocError;

/// `a + b`, or [`AllocError::Overflow`].
#[inline]
pub fn checked_add(a: usize, b: usize) -> Result<usize, AllocError> {
    a.checked_add(b).ok_or(AllocError::Overflow)
}

/// `a * b`, or [`AllocError::Overflow`].
#[inline]
pub fn checked_mul(a: usize, b: usize) -> Result<usize, AllocError> {
    a.checked_mul(b).ok_or(AllocError::Overflow)
}

/// Round `value` up to a multiple of `align` (a power of two).
///
/// Returns `None` on overflow.
#[inline]
pub fn align_up(value: usize, align: usize) -> Option<usize> {
    crate::fluf_assert!(align.is_power_of_two(), "alignment {} is not a power of two", align);
    let mask = align - 1;
    value.checked_add(mask).map(|v| v & !mask)
}

/// Layout for `len` bytes with alignment 1.
#[inline]
pub fn byte_layout(len: usize) -> Result<Layout, AllocError> {
    Layout::from_size_align(len, 1).map_err(|_| AllocError::Overflow)
}

/// Non-null, well-aligned sentinel for zero-sized allocations.
///
/// The pointer must never be dereferenced; it only satisfies the "size 0
/// returns non-null" contract.
#[inline]
pub fn dangling(align: usize) -> NonNull<u8> {
    // The address equals the alignment, which is non-zero for any valid layout.
    NonNull::new(std::ptr::null_mut::<u8>().wrapping_add(align)).unwrap_or(NonNull::dangling())
}
