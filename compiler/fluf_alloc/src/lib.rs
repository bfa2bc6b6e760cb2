//! fluf allocator layer.
//!
//! Every piece of long-lived memory in fluf (interned strings, source file
//! contents, string builders) is obtained through an [`AllocHandle`], a
//! reference-counted handle around a dynamically dispatched [`Allocator`].
//!
//! Two backends ship with the crate:
//! - [`SystemAlloc`]: the process heap (`std::alloc`).
//! - [`Bump`]: a chunked arena that hands out pointer-stable memory and
//!   releases everything at once when dropped.
//!
//! # Error Model
//!
//! The raw [`Allocator`] methods signal OOM with `None`, mirroring a C
//! allocator returning null. Everything layered on top converts that into
//! [`AllocError`]. Size arithmetic is always checked; an overflowing size is
//! reported as [`AllocError::Overflow`] and treated by callers exactly like
//! running out of memory.
//!
//! # Fault Injection
//!
//! [`FaultyAlloc`] wraps another allocator and starts failing after a fixed
//! number of successful allocations, so every consumer can be tested against
//! OOM at each allocation site.

mod assert;
mod bump;
mod error;
mod fault;
mod handle;
mod layout;
mod system;

pub use bump::{Bump, BumpConfig};
pub use error::AllocError;
pub use fault::FaultyAlloc;
pub use handle::{realloc_by_copy, AllocHandle, Allocator};
pub use layout::{align_up, byte_layout, checked_add, checked_mul, dangling};
pub use system::SystemAlloc;
