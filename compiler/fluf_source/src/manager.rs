//! Global offset space over all registered files.

use std::fmt;

use fluf_alloc::{AllocError, AllocHandle};
use fluf_str::Str;

use crate::{FileId, SourceError, SourceFile, Span};

/// Human-facing position of a global offset.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SourceLocation<'a> {
    pub file: FileId,
    pub name: Str<'a>,
    /// 1-based line.
    pub line: u32,
    /// 1-based column, in bytes.
    pub column: u32,
}

impl fmt::Display for SourceLocation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.name, self.line, self.column)
    }
}

/// Owns source files and resolves global offsets.
///
/// Files are append-only. Each file takes `len + 1` offsets (its bytes plus
/// a sentinel), so offsets never collide across files and `total_size` is
/// the first unused offset.
///
/// # Memory
///
/// File names and contents are copied into memory from the manager's
/// allocator. The file list and each line table live on the global heap;
/// their growth is still fallible and reported as [`SourceError::Alloc`].
///
/// # Lookup Cost
///
/// O(log F) to find the file plus O(log L) to find the line. Lookups never
/// allocate.
pub struct SourceManager {
    alloc: AllocHandle,
    files: Vec<SourceFile>,
    total_size: u32,
}

impl SourceManager {
    /// Create a manager that copies files onto the system heap.
    pub fn new() -> Self {
        Self::with_alloc(AllocHandle::system())
    }

    /// Create a manager that copies files into memory from `alloc`.
    pub fn with_alloc(alloc: AllocHandle) -> Self {
        SourceManager {
            alloc,
            files: Vec::new(),
            total_size: 0,
        }
    }

    /// Register a file, copying `name` and `content`.
    ///
    /// The file's first byte gets the current [`SourceManager::total_size`]
    /// as its global offset. On error nothing is registered.
    pub fn add(
        &mut self,
        name: impl AsRef<[u8]>,
        content: impl AsRef<[u8]>,
    ) -> Result<FileId, SourceError> {
        let (name, content) = (name.as_ref(), content.as_ref());
        let len = u32::try_from(content.len()).map_err(|_| SourceError::FileTooLarge {
            len: content.len(),
        })?;
        let base_offset = self.total_size;
        let next_total = base_offset
            .checked_add(len)
            .and_then(|end| end.checked_add(1))
            .ok_or(SourceError::OffsetOverflow {
                total: base_offset,
                len,
            })?;

        // Every file consumes at least one offset, so the count fits in u32.
        #[expect(
            clippy::cast_possible_truncation,
            reason = "file count is bounded by total_size"
        )]
        let id = FileId::from_raw(self.files.len() as u32);

        self.files.try_reserve(1).map_err(AllocError::from)?;
        let file = SourceFile::new(&self.alloc, id, name, content, len, base_offset)?;

        tracing::debug!(
            file = id.raw(),
            name = %file.name(),
            len,
            base_offset,
            lines = file.line_count(),
            "registered source file"
        );
        self.files.push(file);
        self.total_size = next_total;
        Ok(id)
    }

    /// The file holding `offset`, including each file's sentinel offset.
    fn file_at(&self, offset: u32) -> Option<&SourceFile> {
        if offset >= self.total_size {
            return None;
        }
        let idx = self
            .files
            .partition_point(|file| file.base_offset() <= offset)
            .checked_sub(1)?;
        let file = &self.files[idx];
        file.contains(offset).then_some(file)
    }

    /// Resolve a global offset to `(file, line, column)`.
    ///
    /// Returns `None` for offsets at or past [`SourceManager::total_size`].
    pub fn lookup(&self, offset: u32) -> Option<SourceLocation<'_>> {
        let file = self.file_at(offset)?;
        let (line, column) = file.line_col(offset - file.base_offset());
        Some(SourceLocation {
            file: file.id(),
            name: file.name(),
            line,
            column,
        })
    }

    /// File holding a global offset.
    pub fn file_for_offset(&self, offset: u32) -> Option<FileId> {
        self.file_at(offset).map(SourceFile::id)
    }

    /// The line holding `offset`, without its `\n`.
    ///
    /// Returns an empty slice when `offset` is out of range. A `\r` before
    /// the `\n` is part of the returned text.
    pub fn line_content(&self, offset: u32) -> &[u8] {
        let Some(file) = self.file_at(offset) else {
            return &[];
        };
        let line = file.line_of(offset - file.base_offset());
        file.line(line).unwrap_or_default()
    }

    /// Text covered by `span`, if it lies within a single file.
    pub fn span_text(&self, span: Span) -> Option<&[u8]> {
        let file = self.file_at(span.start)?;
        if span.end > file.end_offset() {
            return None;
        }
        let base = file.base_offset();
        let range = (span.start - base) as usize..(span.end - base) as usize;
        file.content().get(range)
    }

    /// Bounds-checked file access.
    pub fn get_file(&self, id: FileId) -> Option<&SourceFile> {
        self.files.get(id.index())
    }

    /// File access.
    ///
    /// # Panics
    /// Panics if `id` did not come from this manager.
    pub fn file(&self, id: FileId) -> &SourceFile {
        self.get_file(id).unwrap_or_else(|| {
            panic!(
                "file id {} out of range for source manager holding {} files",
                id.raw(),
                self.files.len()
            )
        })
    }

    /// All files in registration order.
    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// First unused global offset: the sum of `len + 1` over all files.
    pub fn total_size(&self) -> u32 {
        self.total_size
    }

    pub fn allocator(&self) -> &AllocHandle {
        &self.alloc
    }
}

impl Default for SourceManager {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SourceManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceManager")
            .field("files", &self.files)
            .field("total_size", &self.total_size)
            .finish_non_exhaustive()
    }
}
