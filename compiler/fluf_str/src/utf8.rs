//! UTF-8 decoding over raw bytes.
//!
//! Source text is not guaranteed to be valid UTF-8, so decoding never fails:
//! every malformed sequence becomes `U+FFFD` and consumes exactly one byte,
//! which lets a scanner keep going and report more than the first error.

/// Substitute for malformed input.
pub const REPLACEMENT: char = '\u{FFFD}';

/// Decode the first scalar value of `bytes`.
///
/// Returns the character and the number of bytes it occupies, or `None` at
/// end of input. Overlong encodings, surrogates, values past `U+10FFFF`,
/// stray continuation bytes and truncated sequences all decode as
/// `(REPLACEMENT, 1)`.
pub fn decode_utf8(bytes: &[u8]) -> Option<(char, usize)> {
    let &lead = bytes.first()?;
    if lead < 0x80 {
        return Some((char::from(lead), 1));
    }

    // C0 and C1 could only start overlong two-byte forms.
    let (width, payload, min) = match lead {
        0xC2..=0xDF => (2, u32::from(lead & 0x1F), 0x80),
        0xE0..=0xEF => (3, u32::from(lead & 0x0F), 0x800),
        0xF0..=0xF4 => (4, u32::from(lead & 0x07), 0x1_0000),
        _ => return Some((REPLACEMENT, 1)),
    };
    let Some(tail) = bytes.get(1..width) else {
        return Some((REPLACEMENT, 1));
    };

    let mut code = payload;
    for &byte in tail {
        if byte & 0xC0 != 0x80 {
            return Some((REPLACEMENT, 1));
        }
        code = (code << 6) | u32::from(byte & 0x3F);
    }
    if code < min {
        return Some((REPLACEMENT, 1));
    }
    // from_u32 rejects surrogates and anything past U+10FFFF.
    match char::from_u32(code) {
        Some(c) => Some((c, width)),
        None => Some((REPLACEMENT, 1)),
    }
}

/// Encode a code point into `out`, returning the number of bytes written.
///
/// Returns 0 (and leaves `out` untouched) for surrogates and values past
/// `U+10FFFF`.
pub fn encode_utf8(code: u32, out: &mut [u8; 4]) -> usize {
    char::from_u32(code).map_or(0, |c| c.encode_utf8(out).len())
}

/// Forward iterator over the characters of a byte slice.
///
/// Tracks its byte position so callers can build spans from it.
#[derive(Clone, Debug)]
pub struct Utf8Chars<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Utf8Chars<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Utf8Chars { bytes, offset: 0 }
    }

    /// Decode the next character without consuming it.
    #[inline]
    pub fn peek(&self) -> Option<char> {
        self.peek_with_width().map(|(c, _)| c)
    }

    /// Next character and its encoded width, without consuming it.
    #[inline]
    pub fn peek_with_width(&self) -> Option<(char, usize)> {
        decode_utf8(self.bytes.get(self.offset..)?)
    }

    /// Byte offset of the next character.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.offset >= self.bytes.len()
    }

    /// Bytes not yet consumed.
    #[inline]
    pub fn remaining(&self) -> &'a [u8] {
        self.bytes.get(self.offset..).unwrap_or_default()
    }
}

impl Iterator for Utf8Chars<'_> {
    type Item = char;

    #[inline]
    fn next(&mut self) -> Option<char> {
        let (c, width) = self.peek_with_width()?;
        self.offset += width;
        Some(c)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.bytes.len().saturating_sub(self.offset);
        (left.div_ceil(4), Some(left))
    }
}

impl std::iter::FusedIterator for Utf8Chars<'_> {}
