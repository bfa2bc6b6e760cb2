//! Source manager errors.

use fluf_alloc::AllocError;
use thiserror::Error;

/// Error when registering a file fails.
///
/// The manager is left unchanged whenever one of these is returned.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SourceError {
    /// Copying the file or building its line table ran out of memory.
    #[error("source manager out of memory: {0}")]
    Alloc(#[from] AllocError),

    /// A single file longer than the offset space.
    #[error("file of {len} bytes exceeds the {max} byte offset space", max = u32::MAX)]
    FileTooLarge { len: usize },

    /// Adding the file would push global offsets past `u32::MAX`.
    #[error("adding {len} bytes at offset {total} overflows the global offset space")]
    OffsetOverflow { total: u32, len: u32 },
}
