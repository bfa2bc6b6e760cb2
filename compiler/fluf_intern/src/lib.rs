//! String interning for fluf.
//!
//! [`Interner`] maps byte strings to dense [`Symbol`]s. Interned bytes are
//! copied into a bump arena owned by the interner, so they never move and
//! every stored string is followed by a NUL byte.
//!
//! Symbols are only meaningful for the interner that produced them.

mod error;
mod interner;
mod symbol;

pub use error::InternError;
pub use interner::{Interner, SymbolLookup};
pub use symbol::Symbol;
