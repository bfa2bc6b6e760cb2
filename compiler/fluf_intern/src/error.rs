//! Interner errors.

use fluf_alloc::AllocError;
use thiserror::Error;

/// Error when interning a string fails.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InternError {
    /// The arena or one of the tables could not grow.
    #[error("interner out of memory: {0}")]
    Alloc(#[from] AllocError),

    /// More distinct strings than a `u32` symbol can name.
    #[error("interner exceeded capacity: {count} strings, max is {max}", max = u32::MAX)]
    SymbolOverflow { count: usize },
}
