//! Byte strings for fluf.
//!
//! - [`Str`]: a borrowed byte slice with the comparison, trimming and
//!   splitting helpers a scanner needs. Content need not be UTF-8.
//! - [`StrBuf`]: an owned, NUL-terminated builder whose memory comes from an
//!   [`AllocHandle`](fluf_alloc::AllocHandle). Growth is fallible and
//!   reported as [`AllocError`](fluf_alloc::AllocError).
//! - [`Utf8Chars`] plus [`decode_utf8`]/[`encode_utf8`]: lenient UTF-8
//!   decoding that maps malformed input to `U+FFFD`.
//! - [`chars`]: byte and identifier character classes.

mod buf;
pub mod chars;
mod error;
mod slice;
mod utf8;

pub use buf::StrBuf;
pub use error::FormatError;
pub use slice::{Lines, Split, Str};
pub use utf8::{decode_utf8, encode_utf8, Utf8Chars, REPLACEMENT};
