//! Interned string identifier.

use std::fmt;

/// Interned string identifier.
///
/// Symbols are assigned densely from 0 in the order strings are first
/// interned, so they double as indices into side tables.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct Symbol(u32);

impl Symbol {
    /// Create from a raw id.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Symbol(raw)
    }

    /// Get raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Position in the interner's dense table.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.0)
    }
}
