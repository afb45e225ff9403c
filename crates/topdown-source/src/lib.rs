//! Topdown Source
//!
//! A positional character source for top-down parsing. The source owns the
//! input text (in memory or behind a seekable reader), a read cursor, the
//! current line number and the configured end-of-line convention.
//!
//! Backtracking works through [`Checkpoint`] values: `save()` hands one out,
//! `restore()` takes it back. Checkpoints are plain values, so nested
//! speculative parses never clobber each other.
//!
//! # Example
//!
//! ```
//! use topdown_source::{Eol, Source};
//!
//! let mut src = Source::with_eol("ab\r\ncd", Eol::CrLf);
//! let start = src.save();
//! src.skip_line();
//! assert!(src.is_eol());
//! src.shift();
//! assert_eq!(src.line(), 2);
//! src.restore(start);
//! assert_eq!(src.top(), Some('a'));
//! ```

pub mod eol;
pub mod input;
pub mod source;

pub use eol::Eol;
pub use input::{FileInput, Input, TextInput};
pub use source::{Checkpoint, Source};

/// Error raised while building a source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unknown end-of-line mode '{0}' (expected one of lf, cr, lfcr, crlf, rs)")]
    UnknownEol(String),
}
