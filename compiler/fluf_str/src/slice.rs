//! Borrowed byte string slice.

use std::fmt;
use std::ops::Range;

use crate::Utf8Chars;

/// Non-owning view over a run of bytes.
///
/// Content is not required to be UTF-8 and may contain NUL bytes. Equality,
/// ordering and hashing are over the raw bytes.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Str<'a>(&'a [u8]);

impl<'a> Str<'a> {
    pub const EMPTY: Str<'static> = Str(b"");

    #[inline]
    pub const fn new(bytes: &'a [u8]) -> Self {
        Str(bytes)
    }

    #[inline]
    pub const fn as_bytes(self) -> &'a [u8] {
        self.0
    }

    #[inline]
    pub const fn len(self) -> usize {
        self.0.len()
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0.is_empty()
    }

    /// The bytes as `&str`, if they are valid UTF-8.
    #[inline]
    pub fn to_str(self) -> Option<&'a str> {
        std::str::from_utf8(self.0).ok()
    }

    #[inline]
    pub fn starts_with(self, prefix: impl AsRef<[u8]>) -> bool {
        self.0.starts_with(prefix.as_ref())
    }

    #[inline]
    pub fn ends_with(self, suffix: impl AsRef<[u8]>) -> bool {
        self.0.ends_with(suffix.as_ref())
    }

    /// Byte-indexed substring.
    ///
    /// # Panics
    ///
    /// Panics if `range` is out of bounds or decreasing, like slice indexing.
    #[inline]
    pub fn slice(self, range: Range<usize>) -> Str<'a> {
        Str(&self.0[range])
    }

    /// Byte-indexed substring, or `None` when out of bounds.
    #[inline]
    pub fn get(self, range: Range<usize>) -> Option<Str<'a>> {
        self.0.get(range).map(Str)
    }

    /// Position of the first `byte`.
    #[inline]
    pub fn find_byte(self, byte: u8) -> Option<usize> {
        memchr::memchr(byte, self.0)
    }

    pub fn trim_start(self) -> Str<'a> {
        let start = self
            .0
            .iter()
            .position(|&b| !is_trim_space(b))
            .unwrap_or(self.0.len());
        Str(&self.0[start..])
    }

    pub fn trim_end(self) -> Str<'a> {
        let end = self
            .0
            .iter()
            .rposition(|&b| !is_trim_space(b))
            .map_or(0, |i| i + 1);
        Str(&self.0[..end])
    }

    /// Strip space, tab, `\n` and `\r` from both ends.
    pub fn trim(self) -> Str<'a> {
        self.trim_start().trim_end()
    }

    /// Split on every `delim`.
    ///
    /// Yields one chunk more than there are delimiters, so empty input
    /// yields a single empty chunk and `"a,"` yields `"a"` then `""`.
    pub fn split(self, delim: u8) -> Split<'a> {
        Split {
            rest: Some(self.0),
            delim,
        }
    }

    /// Split into lines on `\n`, dropping a `\r` before it.
    ///
    /// A trailing newline does not produce a final empty line, and empty
    /// input yields nothing.
    pub fn lines(self) -> Lines<'a> {
        Lines { rest: self.0 }
    }

    /// Decode as UTF-8, substituting `U+FFFD` for malformed bytes.
    pub fn chars(self) -> Utf8Chars<'a> {
        Utf8Chars::new(self.0)
    }
}

#[inline]
fn is_trim_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}

impl<'a> From<&'a [u8]> for Str<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Str(bytes)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for Str<'a> {
    fn from(bytes: &'a [u8; N]) -> Self {
        Str(bytes)
    }
}

impl<'a> From<&'a str> for Str<'a> {
    fn from(s: &'a str) -> Self {
        Str(s.as_bytes())
    }
}

impl AsRef<[u8]> for Str<'_> {
    fn as_ref(&self) -> &[u8] {
        self.0
    }
}

impl PartialEq<[u8]> for Str<'_> {
    fn eq(&self, other: &[u8]) -> bool {
        self.0 == other
    }
}

impl PartialEq<&[u8]> for Str<'_> {
    fn eq(&self, other: &&[u8]) -> bool {
        self.0 == *other
    }
}

impl<const N: usize> PartialEq<&[u8; N]> for Str<'_> {
    fn eq(&self, other: &&[u8; N]) -> bool {
        self.0 == other.as_slice()
    }
}

impl PartialEq<str> for Str<'_> {
    fn eq(&self, other: &str) -> bool {
        self.0 == other.as_bytes()
    }
}

impl PartialEq<&str> for Str<'_> {
    fn eq(&self, other: &&str) -> bool {
        self.0 == other.as_bytes()
    }
}

impl fmt::Display for Str<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&String::from_utf8_lossy(self.0), f)
    }
}

impl fmt::Debug for Str<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "b\"{}\"", self.0.escape_ascii())
    }
}

/// Iterator returned by [`Str::split`].
#[derive(Clone, Debug)]
pub struct Split<'a> {
    /// `None` once the final chunk has been produced.
    rest: Option<&'a [u8]>,
    delim: u8,
}

impl<'a> Iterator for Split<'a> {
    type Item = Str<'a>;

    fn next(&mut self) -> Option<Str<'a>> {
        let rest = self.rest?;
        match memchr::memchr(self.delim, rest) {
            Some(i) => {
                self.rest = Some(&rest[i + 1..]);
                Some(Str(&rest[..i]))
            }
            None => {
                self.rest = None;
                Some(Str(rest))
            }
        }
    }
}

impl std::iter::FusedIterator for Split<'_> {}

/// Iterator returned by [`Str::lines`].
#[derive(Clone, Debug)]
pub struct Lines<'a> {
    rest: &'a [u8],
}

impl<'a> Iterator for Lines<'a> {
    type Item = Str<'a>;

    fn next(&mut self) -> Option<Str<'a>> {
        if self.rest.is_empty() {
            return None;
        }
        let (line, rest) = match memchr::memchr(b'\n', self.rest) {
            Some(i) => (&self.rest[..i], &self.rest[i + 1..]),
            None => (self.rest, &self.rest[self.rest.len()..]),
        };
        self.rest = rest;
        Some(Str(line.strip_suffix(b"\r").unwrap_or(line)))
    }
}

impl std::iter::FusedIterator for Lines<'_> {}
