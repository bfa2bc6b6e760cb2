//! Chunked bump arena.
//!
//! The arena requests chunks from a backing [`AllocHandle`] and carves
//! allocations out of the newest chunk by advancing a cursor. Individual
//! frees are no-ops; all chunks go back to the backing allocator when the
//! arena is dropped.
//!
//! # Layout
//!
//! ```text
//! chunk: [ used ... | padding | new allocation | free ........ ]
//!         ^                   ^                ^               ^
//!         start         align_up(cursor)   new cursor      chunk end
//! ```
//!
//! When a request does not fit, a new chunk of at least
//! `max(2 * previous_chunk, requested)` bytes is acquired. Older chunks are
//! never touched again, which is what makes every returned pointer stable
//! until the arena is reset or dropped.

#![allow(
    unsafe_code,
    reason = "the arena hands out raw memory carved from backing chunks"
)]

use std::alloc::Layout;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::ptr::NonNull;

use crate::{align_up, byte_layout, checked_add, dangling, AllocError, AllocHandle, Allocator};

/// Alignment of every chunk requested from the backing allocator.
const CHUNK_ALIGN: usize = 16;

/// Size of the first chunk unless configured otherwise.
const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Tuning knobs for a [`Bump`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BumpConfig {
    /// Minimum alignment of every allocation. Power of two, at most 16.
    pub min_align: usize,
    /// Hard cap on bytes requested from the backing allocator.
    pub limit: Option<usize>,
    /// Size of the first chunk; later chunks double.
    pub initial_chunk_size: usize,
}

impl BumpConfig {
    pub const DEFAULT: BumpConfig = BumpConfig {
        min_align: 1,
        limit: None,
        initial_chunk_size: DEFAULT_CHUNK_SIZE,
    };

    #[must_use]
    pub const fn with_min_align(mut self, min_align: usize) -> Self {
        self.min_align = min_align;
        self
    }

    #[must_use]
    pub const fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub const fn with_initial_chunk_size(mut self, size: usize) -> Self {
        self.initial_chunk_size = size;
        self
    }
}

impl Default for BumpConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// One block obtained from the backing allocator.
struct Chunk {
    start: NonNull<u8>,
    layout: Layout,
}

/// Bump arena over a backing allocator.
///
/// Allocation takes `&self`, so references returned by the safe helpers
/// ([`Bump::alloc_bytes`] and friends) can coexist with further
/// allocations. Anything that invalidates memory ([`Bump::reset`], drop)
/// needs `&mut self` or ownership.
pub struct Bump {
    backing: AllocHandle,
    config: BumpConfig,
    /// Newest chunk last.
    chunks: RefCell<Vec<Chunk>>,
    /// Offset of the first free byte in the newest chunk.
    cursor: Cell<usize>,
    /// Offset of the most recent allocation in the newest chunk.
    last: Cell<Option<usize>>,
    /// Bytes currently held from the backing allocator.
    allocated: Cell<usize>,
}

impl Bump {
    /// Create an empty arena. No memory is requested until the first
    /// allocation.
    pub fn new(backing: AllocHandle) -> Self {
        Self::with_config(backing, BumpConfig::DEFAULT)
    }

    pub fn with_config(backing: AllocHandle, mut config: BumpConfig) -> Self {
        crate::fluf_assert!(
            config.min_align.is_power_of_two() && config.min_align <= CHUNK_ALIGN,
            "min_align {} must be a power of two no larger than {}",
            config.min_align,
            CHUNK_ALIGN
        );
        if !config.min_align.is_power_of_two() {
            config.min_align = 1;
        }
        config.min_align = config.min_align.min(CHUNK_ALIGN);

        Bump {
            backing,
            config,
            chunks: RefCell::new(Vec::new()),
            cursor: Cell::new(0),
            last: Cell::new(None),
            allocated: Cell::new(0),
        }
    }

    pub fn config(&self) -> &BumpConfig {
        &self.config
    }

    /// Bytes currently held from the backing allocator, including padding
    /// and unused chunk tails.
    pub fn allocated_bytes(&self) -> usize {
        self.allocated.get()
    }

    /// Number of chunks currently held.
    pub fn chunk_count(&self) -> usize {
        self.chunks.borrow().len()
    }

    /// Allocate raw memory for `layout`.
    ///
    /// Zero-sized requests return an aligned sentinel without touching the
    /// arena.
    pub fn alloc_layout(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        let align = layout.align().max(self.config.min_align);
        if layout.size() == 0 {
            return Ok(dangling(align));
        }
        match self.alloc_fast(layout.size(), align) {
            Some(ptr) => Ok(ptr),
            None => self.alloc_slow(layout.size(), align),
        }
    }

    /// Copy `bytes` into the arena.
    pub fn alloc_bytes(&self, bytes: &[u8]) -> Result<&[u8], AllocError> {
        let ptr = self.alloc_layout(byte_layout(bytes.len())?)?;
        // SAFETY: `ptr` addresses `bytes.len()` fresh bytes nothing else
        // refers to. They stay in place until `reset` or drop, both of which
        // need exclusive access to the arena.
        unsafe {
            std::ptr::copy_nonoverlapping(bytes.as_ptr(), ptr.as_ptr(), bytes.len());
            Ok(std::slice::from_raw_parts(ptr.as_ptr(), bytes.len()))
        }
    }

    /// Copy `bytes` into the arena followed by a NUL byte.
    ///
    /// The returned slice includes the trailing NUL.
    pub fn alloc_bytes_with_nul(&self, bytes: &[u8]) -> Result<&[u8], AllocError> {
        let total = checked_add(bytes.len(), 1)?;
        let ptr = self.alloc_layout(byte_layout(total)?)?;
        // SAFETY: `ptr` addresses `total` fresh bytes; see `alloc_bytes`.
        unsafe {
            std::ptr::copy_nonoverlapping(bytes.as_ptr(), ptr.as_ptr(), bytes.len());
            ptr.as_ptr().add(bytes.len()).write(0);
            Ok(std::slice::from_raw_parts(ptr.as_ptr(), total))
        }
    }

    /// Copy a string into the arena.
    pub fn alloc_str(&self, s: &str) -> Result<&str, AllocError> {
        let bytes = self.alloc_bytes(s.as_bytes())?;
        // SAFETY: an exact copy of valid UTF-8.
        Ok(unsafe { std::str::from_utf8_unchecked(bytes) })
    }

    /// Release every chunk except the newest and rewind it.
    ///
    /// The newest chunk is kept so a steady-state workload does not go back
    /// to the backing allocator on every cycle.
    pub fn reset(&mut self) {
        let chunks = self.chunks.get_mut();
        let Some(newest) = chunks.pop() else {
            return;
        };
        for chunk in chunks.drain(..) {
            // SAFETY: every chunk came from `backing` with its recorded
            // layout, and `&mut self` rules out outstanding borrows.
            unsafe { self.backing.free(chunk.start, chunk.layout) };
        }
        self.allocated.set(newest.layout.size());
        chunks.push(newest);
        self.cursor.set(0);
        self.last.set(None);
    }

    fn alloc_fast(&self, size: usize, align: usize) -> Option<NonNull<u8>> {
        let chunks = self.chunks.borrow();
        let chunk = chunks.last()?;
        let base = chunk.start.as_ptr() as usize;
        let aligned = align_up(base.checked_add(self.cursor.get())?, align)?;
        let offset = aligned - base;
        let end = offset.checked_add(size)?;
        if end > chunk.layout.size() {
            return None;
        }
        self.cursor.set(end);
        self.last.set(Some(offset));
        // SAFETY: `offset + size <= chunk size`, so the result stays inside
        // the chunk.
        Some(unsafe { chunk.start.add(offset) })
    }

    fn alloc_slow(&self, size: usize, align: usize) -> Result<NonNull<u8>, AllocError> {
        let previous = self.chunks.borrow().last().map_or(0, |c| c.layout.size());
        let grown = previous
            .saturating_mul(2)
            .max(self.config.initial_chunk_size)
            .max(size);
        let mut chunk_size = align_up(grown, CHUNK_ALIGN).ok_or(AllocError::Overflow)?;

        if let Some(limit) = self.config.limit {
            let remaining = limit.saturating_sub(self.allocated.get());
            if size > remaining {
                tracing::debug!(
                    size,
                    limit,
                    allocated = self.allocated.get(),
                    "bump: allocation limit reached"
                );
                return Err(AllocError::LimitExceeded {
                    requested: size,
                    limit,
                });
            }
            chunk_size = chunk_size.min(remaining);
        }

        // Chunks are at least as aligned as the request, so offset 0 works.
        let layout = Layout::from_size_align(chunk_size, align.max(CHUNK_ALIGN))
            .map_err(|_| AllocError::Overflow)?;
        self.chunks.borrow_mut().try_reserve(1)?;
        let start = self.backing.try_alloc(layout).inspect_err(|_| {
            tracing::debug!(chunk_size, "bump: backing allocator refused chunk");
        })?;

        self.chunks.borrow_mut().push(Chunk { start, layout });
        self.allocated
            .set(self.allocated.get().saturating_add(chunk_size));
        self.cursor.set(size);
        self.last.set(Some(0));
        tracing::debug!(
            chunk_size,
            allocated = self.allocated.get(),
            "bump: acquired chunk"
        );
        Ok(start)
    }

    /// Extend the most recent allocation without moving it.
    fn grow_in_place(&self, ptr: NonNull<u8>, new: Layout) -> Option<NonNull<u8>> {
        let chunks = self.chunks.borrow();
        let chunk = chunks.last()?;
        let offset = self.last.get()?;
        // SAFETY: `last` is always an offset inside the newest chunk.
        let last_ptr = unsafe { chunk.start.add(offset) };
        if last_ptr != ptr || ptr.as_ptr() as usize % new.align() != 0 {
            return None;
        }
        let end = offset.checked_add(new.size())?;
        if end > chunk.layout.size() {
            return None;
        }
        self.cursor.set(end);
        Some(ptr)
    }
}

// SAFETY: every block is carved from a live chunk at an aligned offset past
// all earlier blocks, and chunks are only released by `reset` or drop.
unsafe impl Allocator for Bump {
    #[inline]
    fn alloc(&self, layout: Layout) -> Option<NonNull<u8>> {
        self.alloc_layout(layout).ok()
    }

    #[inline]
    unsafe fn free(&self, _ptr: NonNull<u8>, _layout: Layout) {
        // Memory is reclaimed when the arena is reset or dropped.
    }

    unsafe fn realloc(&self, ptr: NonNull<u8>, old: Layout, new: Layout) -> Option<NonNull<u8>> {
        if new.size() == 0 {
            return Some(dangling(new.align().max(self.config.min_align)));
        }
        if old.size() == 0 {
            return self.alloc(new);
        }
        if new.size() <= old.size() && ptr.as_ptr() as usize % new.align() == 0 {
            return Some(ptr);
        }
        if let Some(grown) = self.grow_in_place(ptr, new) {
            return Some(grown);
        }
        let new_ptr = self.alloc(new)?;
        // SAFETY: the old block is still live (frees are no-ops) and the new
        // block is a distinct fresh allocation.
        unsafe {
            std::ptr::copy_nonoverlapping(
                ptr.as_ptr(),
                new_ptr.as_ptr(),
                old.size().min(new.size()),
            );
        }
        Some(new_ptr)
    }
}

impl Drop for Bump {
    fn drop(&mut self) {
        for chunk in self.chunks.get_mut().drain(..) {
            // SAFETY: every chunk came from `backing` with its recorded layout.
            unsafe { self.backing.free(chunk.start, chunk.layout) };
        }
    }
}

impl fmt::Debug for Bump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bump")
            .field("config", &self.config)
            .field("chunks", &self.chunk_count())
            .field("allocated", &self.allocated.get())
            .field("cursor", &self.cursor.get())
            .finish_non_exhaustive()
    }
}
