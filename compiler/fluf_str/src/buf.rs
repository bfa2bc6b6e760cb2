//! Growable, NUL-terminated byte string builder.

#![allow(
    unsafe_code,
    reason = "the builder manages a raw buffer obtained from an AllocHandle"
)]

use std::alloc::Layout;
use std::fmt;
use std::ptr::NonNull;

use fluf_alloc::{byte_layout, checked_add, AllocError, AllocHandle};

use crate::{FormatError, Str};

/// Capacity of the first allocation.
const MIN_CAPACITY: usize = 16;

/// Owned byte string backed by an [`AllocHandle`].
///
/// Once a buffer has been allocated, the byte at `len` is always NUL, so
/// [`StrBuf::as_bytes_with_nul`] can hand the contents to C-style consumers
/// without copying. Every mutating operation either succeeds or leaves the
/// builder exactly as it was.
pub struct StrBuf {
    alloc: AllocHandle,
    /// Dangling while `layout.size() == 0`.
    data: NonNull<u8>,
    len: usize,
    /// Layout of the current block; its size is the capacity.
    layout: Layout,
}

impl StrBuf {
    /// Empty builder. Allocates nothing.
    pub fn new(alloc: AllocHandle) -> Self {
        StrBuf {
            alloc,
            data: NonNull::dangling(),
            len: 0,
            layout: Layout::new::<()>(),
        }
    }

    /// Empty builder with room for at least `hint` bytes plus the
    /// terminator.
    pub fn with_capacity(alloc: AllocHandle, hint: usize) -> Result<Self, AllocError> {
        let mut buf = Self::new(alloc);
        if hint > 0 {
            buf.grow(hint)?;
        }
        Ok(buf)
    }

    /// Copy `bytes` into a builder whose capacity is exactly
    /// `bytes.len() + 1`.
    pub fn from_bytes(alloc: AllocHandle, bytes: &[u8]) -> Result<Self, AllocError> {
        let mut buf = Self::new(alloc);
        buf.set_capacity(checked_add(bytes.len(), 1)?)?;
        buf.append(bytes)?;
        Ok(buf)
    }

    /// Duplicate into a new buffer from the same allocator.
    pub fn try_clone(&self) -> Result<Self, AllocError> {
        Self::from_bytes(self.alloc.clone(), self.as_bytes())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bytes the current block can hold, terminator included.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.layout.size()
    }

    pub fn allocator(&self) -> &AllocHandle {
        &self.alloc
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        // SAFETY: `data` holds `len` initialized bytes; when nothing is
        // allocated `len` is 0 and `data` is a dangling, aligned pointer.
        unsafe { std::slice::from_raw_parts(self.data.as_ptr(), self.len) }
    }

    /// Contents followed by the NUL terminator.
    #[inline]
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        if self.capacity() == 0 {
            return b"\0";
        }
        // SAFETY: an allocated buffer always has its terminator at `len`.
        unsafe { std::slice::from_raw_parts(self.data.as_ptr(), self.len + 1) }
    }

    #[inline]
    pub fn as_slice(&self) -> Str<'_> {
        Str::new(self.as_bytes())
    }

    /// Contents as `&str`, if valid UTF-8.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(self.as_bytes()).ok()
    }

    /// Make room for `additional` more bytes.
    pub fn reserve(&mut self, additional: usize) -> Result<(), AllocError> {
        let needed = checked_add(self.len, additional)?;
        if needed >= self.capacity() {
            self.grow(needed)?;
        }
        Ok(())
    }

    pub fn push(&mut self, byte: u8) -> Result<(), AllocError> {
        self.reserve(1)?;
        // SAFETY: `reserve` guarantees room for `len + 1` bytes plus the
        // terminator.
        unsafe {
            self.data.as_ptr().add(self.len).write(byte);
            self.len += 1;
            self.data.as_ptr().add(self.len).write(0);
        }
        Ok(())
    }

    /// Append the UTF-8 encoding of `c`.
    pub fn push_char(&mut self, c: char) -> Result<(), AllocError> {
        let mut utf8 = [0u8; 4];
        self.append(c.encode_utf8(&mut utf8).as_bytes())
    }

    pub fn append(&mut self, bytes: &[u8]) -> Result<(), AllocError> {
        if bytes.is_empty() {
            return Ok(());
        }
        self.reserve(bytes.len())?;
        // SAFETY: `reserve` guarantees room for the new bytes plus the
        // terminator; `bytes` cannot alias our buffer because we hold it
        // mutably.
        unsafe {
            std::ptr::copy_nonoverlapping(
                bytes.as_ptr(),
                self.data.as_ptr().add(self.len),
                bytes.len(),
            );
            self.len += bytes.len();
            self.data.as_ptr().add(self.len).write(0);
        }
        Ok(())
    }

    /// Append formatted text.
    ///
    /// If formatting fails part-way, the bytes written so far are removed
    /// again.
    ///
    /// ```
    /// # use fluf_alloc::AllocHandle;
    /// # use fluf_str::StrBuf;
    /// let mut buf = StrBuf::new(AllocHandle::system());
    /// buf.append_fmt(format_args!("{}:{}", "a.f", 3)).unwrap();
    /// assert_eq!(buf.as_bytes(), b"a.f:3");
    /// ```
    pub fn append_fmt(&mut self, args: fmt::Arguments<'_>) -> Result<(), FormatError> {
        let start = self.len;
        let mut writer = Recorder {
            buf: self,
            error: None,
        };
        if fmt::write(&mut writer, args).is_ok() {
            return Ok(());
        }
        let error = writer.error;
        self.truncate(start);
        Err(error.map_or(FormatError::Format, FormatError::Alloc))
    }

    /// Shorten to `len` bytes. No effect if already shorter.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.len {
            return;
        }
        self.len = len;
        // SAFETY: `len` is within the allocated buffer.
        unsafe { self.data.as_ptr().add(len).write(0) };
    }

    /// Drop the contents, keeping the capacity.
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Grow so that `needed` bytes plus the terminator fit.
    fn grow(&mut self, needed: usize) -> Result<(), AllocError> {
        let required = checked_add(needed, 1)?;
        let mut new_cap = match self.capacity() {
            0 => MIN_CAPACITY,
            cap => cap.saturating_mul(2),
        };
        if new_cap < required {
            new_cap = required
                .checked_next_power_of_two()
                .ok_or(AllocError::Overflow)?;
        }
        self.set_capacity(new_cap)
    }

    fn set_capacity(&mut self, new_cap: usize) -> Result<(), AllocError> {
        let new_layout = byte_layout(new_cap)?;
        let data = if self.capacity() == 0 {
            self.alloc.try_alloc(new_layout)?
        } else {
            // SAFETY: `data` is live for `layout` and came from `alloc`.
            unsafe { self.alloc.realloc(self.data, self.layout, new_layout) }
                .ok_or_else(|| AllocError::out_of_memory(new_layout))?
        };
        self.data = data;
        self.layout = new_layout;
        // SAFETY: `new_cap > len`, so the terminator slot is in bounds.
        unsafe { self.data.as_ptr().add(self.len).write(0) };
        Ok(())
    }
}

impl Drop for StrBuf {
    fn drop(&mut self) {
        if self.capacity() > 0 {
            // SAFETY: `data` is live for `layout` and came from `alloc`.
            unsafe { self.alloc.free(self.data, self.layout) };
        }
    }
}

impl fmt::Write for StrBuf {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.append(s.as_bytes()).map_err(|_| fmt::Error)
    }
}

/// `fmt::Write` adapter that remembers why a write failed.
struct Recorder<'a> {
    buf: &'a mut StrBuf,
    error: Option<AllocError>,
}

impl fmt::Write for Recorder<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.buf.append(s.as_bytes()).map_err(|err| {
            self.error = Some(err);
            fmt::Error
        })
    }
}

impl PartialEq for StrBuf {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for StrBuf {}

impl PartialEq<[u8]> for StrBuf {
    fn eq(&self, other: &[u8]) -> bool {
        self.as_bytes() == other
    }
}

impl PartialEq<&str> for StrBuf {
    fn eq(&self, other: &&str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl AsRef<[u8]> for StrBuf {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl fmt::Display for StrBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.as_slice(), f)
    }
}

impl fmt::Debug for StrBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrBuf")
            .field("data", &self.as_slice())
            .field("capacity", &self.capacity())
            .finish()
    }
}
