//! Source management for fluf.
//!
//! A [`SourceManager`] owns copies of every registered file and gives each
//! byte a global `u32` offset. Files are laid out back to back, each followed
//! by one reserved sentinel offset:
//!
//! ```text
//! file 0: [0 .. len0]            sentinel at len0
//! file 1: [len0+1 .. len0+1+len1] sentinel at len0+1+len1
//! ```
//!
//! A [`Span`] over global offsets is therefore enough to identify a file,
//! and [`SourceManager::lookup`] turns any offset into a 1-based
//! `(file, line, column)` [`SourceLocation`] with two binary searches.

mod error;
mod file;
mod manager;
mod span;

pub use error::SourceError;
pub use file::{FileId, SourceFile};
pub use manager::{SourceLocation, SourceManager};
pub use span::{Span, SpanError};
