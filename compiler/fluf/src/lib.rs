//! fluf foundation library.
//!
//! Re-exports the building blocks a front end needs before it can lex a
//! single token:
//!
//! - [`alloc`]: the allocator capability, the system heap and bump arena
//!   backends, and fault injection for tests.
//! - [`str`]: byte string slices, the NUL-terminated builder and UTF-8
//!   decoding.
//! - [`intern`]: byte string interning into dense symbols.
//! - [`source`]: the source manager and spans over global offsets.
//!
//! ```
//! use fluf::{Interner, SourceManager, Span};
//!
//! let mut sources = SourceManager::new();
//! sources.add("main.f", "let x = 1\nlet y = x\n").unwrap();
//!
//! let mut names = Interner::new();
//! let x = names.intern(b"x");
//!
//! let loc = sources.lookup(14).unwrap();
//! assert_eq!(loc.to_string(), "main.f:2:5");
//! assert_eq!(sources.span_text(Span::new(18, 19)), Some(names.resolve(x)));
//! ```

use std::sync::Once;

pub use fluf_alloc as alloc;
pub use fluf_intern as intern;
pub use fluf_source as source;
pub use fluf_str as str;

pub use fluf_alloc::{AllocError, AllocHandle, Allocator, Bump, BumpConfig, SystemAlloc};
pub use fluf_intern::{InternError, Interner, Symbol, SymbolLookup};
pub use fluf_source::{FileId, SourceError, SourceFile, SourceLocation, SourceManager, Span};
pub use fluf_str::{Str, StrBuf, Utf8Chars};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Call this once at startup. Safe to call multiple times.
/// Enable with `RUST_LOG=fluf_source=debug` or `RUST_LOG=fluf_intern=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
