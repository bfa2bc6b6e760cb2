//! A registered source file and its line table.

use std::fmt;

use fluf_alloc::{AllocError, AllocHandle};
use fluf_str::{Str, StrBuf};

use crate::Span;

/// Identifier of a file within one [`crate::SourceManager`].
///
/// Ids are assigned densely from 0 in registration order.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct FileId(u32);

impl FileId {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        FileId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileId({})", self.0)
    }
}

/// One file owned by the source manager.
///
/// Name and content are private NUL-terminated copies. The file occupies
/// global offsets `base_offset ..= base_offset + len`; the last of those is
/// the sentinel just past the final byte.
pub struct SourceFile {
    id: FileId,
    name: StrBuf,
    content: StrBuf,
    base_offset: u32,
    len: u32,
    /// Local offset of the first byte of each line. `line_starts[0] == 0`,
    /// then one entry after every `\n`.
    line_starts: Vec<u32>,
}

impl SourceFile {
    /// Copy `name` and `content` and index the lines. `len` is
    /// `content.len()`, already checked to fit in `u32`.
    pub(crate) fn new(
        alloc: &AllocHandle,
        id: FileId,
        name: &[u8],
        content: &[u8],
        len: u32,
        base_offset: u32,
    ) -> Result<Self, AllocError> {
        let line_starts = line_starts(content)?;
        let name = StrBuf::from_bytes(alloc.clone(), name)?;
        let content = StrBuf::from_bytes(alloc.clone(), content)?;
        Ok(SourceFile {
            id,
            name,
            content,
            base_offset,
            len,
            line_starts,
        })
    }

    #[inline]
    pub fn id(&self) -> FileId {
        self.id
    }

    /// The filename exactly as registered.
    #[inline]
    pub fn name(&self) -> Str<'_> {
        self.name.as_slice()
    }

    #[inline]
    pub fn content(&self) -> &[u8] {
        self.content.as_bytes()
    }

    /// Content followed by its NUL terminator.
    #[inline]
    pub fn content_with_nul(&self) -> &[u8] {
        self.content.as_bytes_with_nul()
    }

    /// Length in bytes.
    #[inline]
    pub fn len(&self) -> u32 {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Global offset of the first byte.
    #[inline]
    pub fn base_offset(&self) -> u32 {
        self.base_offset
    }

    /// Global offset of the sentinel just past the last byte.
    #[inline]
    pub fn end_offset(&self) -> u32 {
        self.base_offset + self.len
    }

    /// Global span of the whole content.
    #[inline]
    pub fn span(&self) -> Span {
        Span::new(self.base_offset, self.end_offset())
    }

    /// Does `offset` fall within this file, sentinel included?
    #[inline]
    pub fn contains(&self, offset: u32) -> bool {
        self.base_offset <= offset && offset <= self.end_offset()
    }

    #[inline]
    pub fn line_starts(&self) -> &[u32] {
        &self.line_starts
    }

    /// Number of lines. A trailing `\n` starts an empty final line.
    #[inline]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// 1-based `(line, column)` of a local offset, in bytes.
    ///
    /// Offsets past the end are clamped to the sentinel position.
    pub fn line_col(&self, local: u32) -> (u32, u32) {
        let local = local.min(self.len);
        let idx = self.line_index(local);
        let start = self.line_starts[idx];
        let line = u32::try_from(idx + 1).unwrap_or(u32::MAX);
        (line, local - start + 1)
    }

    /// Text of 1-based line `line` without its terminating `\n`.
    ///
    /// A `\r` before the `\n` is kept.
    pub fn line(&self, line: u32) -> Option<&[u8]> {
        let idx = (line as usize).checked_sub(1)?;
        let start = *self.line_starts.get(idx)? as usize;
        let end = self
            .line_starts
            .get(idx + 1)
            .map_or(self.len as usize, |&next| next as usize);
        let text = &self.content()[start..end];
        Some(text.strip_suffix(b"\n").unwrap_or(text))
    }

    /// Index into `line_starts` of the line holding `local`.
    #[inline]
    fn line_index(&self, local: u32) -> usize {
        // `line_starts[0] == 0`, so at least one entry is `<= local`.
        self.line_starts
            .partition_point(|&start| start <= local)
            .saturating_sub(1)
    }

    /// 1-based line holding a local offset.
    pub(crate) fn line_of(&self, local: u32) -> u32 {
        self.line_col(local).0
    }
}

impl fmt::Debug for SourceFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceFile")
            .field("id", &self.id)
            .field("name", &self.name())
            .field("base_offset", &self.base_offset)
            .field("len", &self.len)
            .field("lines", &self.line_starts.len())
            .finish_non_exhaustive()
    }
}

/// Line start offsets of `content`: 0, then one past every `\n`.
///
/// `content.len()` must fit in `u32`.
pub(crate) fn line_starts(content: &[u8]) -> Result<Vec<u32>, AllocError> {
    let newlines = memchr::memchr_iter(b'\n', content).count();
    let mut starts = Vec::new();
    starts.try_reserve_exact(newlines + 1)?;
    starts.push(0);
    for pos in memchr::memchr_iter(b'\n', content) {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "callers reject content longer than u32::MAX"
        )]
        let start = (pos + 1) as u32;
        starts.push(start);
    }
    Ok(starts)
}
