//! Builder errors.

use fluf_alloc::AllocError;
use thiserror::Error;

/// Failure of [`crate::StrBuf::append_fmt`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FormatError {
    /// The buffer could not grow.
    #[error(transparent)]
    Alloc(#[from] AllocError),

    /// A `Display`/`Debug` implementation reported an error.
    #[error("formatting trait implementation returned an error")]
    Format,
}
