//! Arena-backed string interner.
//!
//! Provides O(1) amortized interning and O(1) resolution. Interned bytes live
//! in a [`Bump`] owned by the interner; the hash map and the dense symbol
//! table both hold raw keys into that arena.

#![allow(
    unsafe_code,
    reason = "interned keys point into the interner's own arena"
)]

use std::borrow::Borrow;
use std::ffi::CStr;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ptr::NonNull;

use fluf_alloc::{AllocError, AllocHandle, Bump};
use rustc_hash::FxHashMap;

use crate::{InternError, Symbol};

/// Key pointing at `len` bytes (followed by a NUL) inside the pool.
///
/// Keys are only created from pool allocations and never escape the
/// interner, so the bytes they point at outlive every key.
#[derive(Clone, Copy)]
struct StableKey {
    ptr: NonNull<u8>,
    len: usize,
}

impl StableKey {
    /// # Safety
    ///
    /// The pool the key was carved from must still be alive.
    #[inline]
    unsafe fn bytes<'a>(self) -> &'a [u8] {
        // SAFETY: guaranteed by the caller.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    /// # Safety
    ///
    /// Same as [`StableKey::bytes`].
    #[inline]
    unsafe fn bytes_with_nul<'a>(self) -> &'a [u8] {
        // SAFETY: the pool stores a NUL after every key.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len + 1) }
    }
}

impl Borrow<[u8]> for StableKey {
    #[inline]
    fn borrow(&self) -> &[u8] {
        // SAFETY: keys only live inside an interner, alongside their pool.
        unsafe { self.bytes() }
    }
}

impl Hash for StableKey {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Must agree with `<[u8] as Hash>` for `Borrow` lookups.
        Borrow::<[u8]>::borrow(self).hash(state);
    }
}

impl PartialEq for StableKey {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        Borrow::<[u8]>::borrow(self) == Borrow::<[u8]>::borrow(other)
    }
}

impl Eq for StableKey {}

/// String interner yielding dense [`Symbol`]s.
///
/// Interning the same bytes twice returns the same symbol. Bytes are
/// compared exactly: interior NULs are part of the key, and there is no
/// normalization.
///
/// Interning needs `&mut self`; resolution borrows the interner, and the
/// returned slices stay valid for as long as that borrow.
///
/// # Memory
///
/// Only the string bytes go through the pool's allocator. The hash map and
/// the symbol table live on the global heap; their growth is still
/// fallible (`try_reserve`) and reported as [`InternError::Alloc`].
pub struct Interner {
    map: FxHashMap<StableKey, Symbol>,
    /// Symbol index to key.
    strings: Vec<StableKey>,
    /// Declared last so it is dropped after the keys that point into it.
    pool: Bump,
}

impl Interner {
    /// Create an interner whose arena draws from the system heap.
    pub fn new() -> Self {
        Self::with_alloc(AllocHandle::system())
    }

    /// Create an interner whose arena draws from `alloc`.
    pub fn with_alloc(alloc: AllocHandle) -> Self {
        Self::with_pool(Bump::new(alloc))
    }

    /// Create an interner that stores strings in `pool`.
    pub fn with_pool(pool: Bump) -> Self {
        Interner {
            map: FxHashMap::default(),
            strings: Vec::new(),
            pool,
        }
    }

    /// Try to intern `bytes`, returning its symbol.
    ///
    /// On failure the interner is left exactly as it was.
    pub fn try_intern(&mut self, bytes: &[u8]) -> Result<Symbol, InternError> {
        if let Some(&sym) = self.map.get(bytes) {
            return Ok(sym);
        }
        self.insert(bytes).inspect_err(|err| {
            tracing::debug!(%err, len = bytes.len(), "interner: insert failed");
        })
    }

    /// Intern `bytes`, returning its symbol.
    ///
    /// # Panics
    /// Panics if memory runs out or the symbol space is exhausted. Use
    /// `try_intern` for fallible interning.
    #[inline]
    pub fn intern(&mut self, bytes: &[u8]) -> Symbol {
        self.try_intern(bytes).unwrap_or_else(|e| panic!("{}", e))
    }

    #[inline]
    pub fn intern_str(&mut self, s: &str) -> Symbol {
        self.intern(s.as_bytes())
    }

    fn insert(&mut self, bytes: &[u8]) -> Result<Symbol, InternError> {
        let count = self.strings.len();
        let raw = u32::try_from(count).map_err(|_| InternError::SymbolOverflow { count })?;

        // Reserve table space before touching the pool so that nothing
        // below can fail once the string is stored.
        self.strings.try_reserve(1).map_err(AllocError::from)?;
        self.map.try_reserve(1).map_err(AllocError::from)?;
        let stored = self.pool.alloc_bytes_with_nul(bytes)?;

        let key = StableKey {
            ptr: NonNull::from(stored).cast::<u8>(),
            len: bytes.len(),
        };
        let sym = Symbol::from_raw(raw);
        self.strings.push(key);
        self.map.insert(key, sym);

        tracing::trace!(symbol = raw, len = bytes.len(), "interned");
        Ok(sym)
    }

    /// Symbol for `bytes` if already interned. Never inserts.
    #[inline]
    pub fn lookup(&self, bytes: &[u8]) -> Option<Symbol> {
        self.map.get(bytes).copied()
    }

    /// Bytes for `sym`, or `None` if this interner never produced it.
    #[inline]
    pub fn get(&self, sym: Symbol) -> Option<&[u8]> {
        let key = self.strings.get(sym.index())?;
        // SAFETY: `self.pool` is alive for the duration of the borrow.
        Some(unsafe { key.bytes() })
    }

    /// Bytes for `sym`.
    ///
    /// # Panics
    /// Panics if `sym` did not come from this interner.
    #[inline]
    pub fn resolve(&self, sym: Symbol) -> &[u8] {
        self.get(sym).unwrap_or_else(|| {
            panic!(
                "symbol {} out of range for interner holding {} strings",
                sym.raw(),
                self.strings.len()
            )
        })
    }

    /// Bytes for `sym` as UTF-8, if they are.
    pub fn resolve_str(&self, sym: Symbol) -> Option<&str> {
        std::str::from_utf8(self.resolve(sym)).ok()
    }

    /// Stored bytes for `sym` including the trailing NUL.
    ///
    /// # Panics
    /// Panics if `sym` did not come from this interner.
    pub fn resolve_with_nul(&self, sym: Symbol) -> &[u8] {
        let key = self.strings.get(sym.index()).unwrap_or_else(|| {
            panic!(
                "symbol {} out of range for interner holding {} strings",
                sym.raw(),
                self.strings.len()
            )
        });
        // SAFETY: `self.pool` is alive for the duration of the borrow.
        unsafe { key.bytes_with_nul() }
    }

    /// The string for `sym` viewed as a C string.
    ///
    /// Like any C string it ends at the first NUL, so a string with an
    /// interior NUL is cut short here; [`Interner::resolve`] always returns
    /// the full bytes.
    ///
    /// # Panics
    /// Panics if `sym` did not come from this interner.
    pub fn resolve_cstr(&self, sym: Symbol) -> &CStr {
        CStr::from_bytes_until_nul(self.resolve_with_nul(sym)).unwrap_or_default()
    }

    /// Number of distinct strings interned.
    #[inline]
    pub fn count(&self) -> usize {
        self.strings.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Bytes held by the string arena.
    pub fn pool_bytes(&self) -> usize {
        self.pool.allocated_bytes()
    }

    /// All interned strings in symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &[u8])> + '_ {
        self.strings.iter().enumerate().map(|(i, key)| {
            #[expect(
                clippy::cast_possible_truncation,
                reason = "insert rejects more than u32::MAX strings"
            )]
            let sym = Symbol::from_raw(i as u32);
            // SAFETY: `self.pool` is alive for the duration of the borrow.
            (sym, unsafe { key.bytes() })
        })
    }
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Interner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interner")
            .field("count", &self.strings.len())
            .field("pool", &self.pool)
            .finish()
    }
}

/// Trait for resolving symbols back to bytes.
///
/// Lets higher-level code accept any resolver without depending on
/// [`Interner`] directly.
pub trait SymbolLookup {
    /// Bytes for an interned symbol.
    fn resolve(&self, sym: Symbol) -> &[u8];
}

impl SymbolLookup for Interner {
    fn resolve(&self, sym: Symbol) -> &[u8] {
        Interner::resolve(self, sym)
    }
}
