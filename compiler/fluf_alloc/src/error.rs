//! Allocation errors.

use std::alloc::Layout;
use std::collections::TryReserveError;

use thiserror::Error;

/// Error returned when memory cannot be obtained.
///
/// Every variant means "out of memory" to callers; the variants only exist
/// so that logs and test assertions can tell the causes apart.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AllocError {
    /// The allocator returned null.
    #[error("out of memory: failed to allocate {size} bytes (align {align})")]
    OutOfMemory { size: usize, align: usize },

    /// A size or capacity computation overflowed `usize` (or `isize::MAX`).
    #[error("allocation size overflow")]
    Overflow,

    /// A bump arena would exceed its configured byte limit.
    #[error("allocation limit exceeded: requested {requested} bytes, limit is {limit}")]
    LimitExceeded { requested: usize, limit: usize },

    /// A standard collection could not grow.
    #[error("failed to reserve collection capacity: {0}")]
    Reserve(#[from] TryReserveError),
}

impl AllocError {
    /// OOM for a specific layout.
    #[inline]
    pub fn out_of_memory(layout: Layout) -> Self {
        AllocError::OutOfMemory {
            size: layout.size(),
            align: layout.align(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_mentions_size_and_align() {
        let Ok(layout) = Layout::from_size_align(64, 8) else {
            panic!("valid layout");
        };
        let msg = AllocError::out_of_memory(layout).to_string();
        assert!(msg.contains("64 bytes"));
        assert!(msg.contains("align 8"));
    }

    #[test]
    fn reserve_error_converts() {
        let mut v: Vec<u64> = Vec::new();
        let Err(err) = v.try_reserve(usize::MAX) else {
            panic!("reserving usize::MAX elements must fail");
        };
        let err = AllocError::from(err);
        assert!(matches!(err, AllocError::Reserve(_)));
    }
}
