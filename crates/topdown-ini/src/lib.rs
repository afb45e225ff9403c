//! Topdown INI
//!
//! A structured configuration grammar built from topdown rules: `#`
//! comments, `[section]` headers and `key = value` / `key: value` pairs,
//! with tab-indented continuation lines.
//!
//! ```text
//! Source text → Document rule → <repeat> node of section nodes of pairs
//! ```
//!
//! # Example
//!
//! ```
//! let tree = topdown_ini::parse_str("[server]\nport = 8080\n").unwrap();
//! let server = tree.as_node().unwrap().find("server").unwrap();
//! assert_eq!(server[0].as_pair(), Some(("port", "8080")));
//! ```

pub mod grammar;

use std::io::{Read, Seek};
use std::path::Path;

use topdown_parser::{ParseError, Rule, Token};
use topdown_source::{Eol, Source, SourceError};
use tracing::debug;

pub use grammar::{Comment, Document, Pair, Section};

/// Failure to load a configuration document.
#[derive(Debug, thiserror::Error)]
pub enum IniError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Source(#[from] SourceError),
}

/// Parse in-memory text with `\n` line endings.
pub fn parse_str(text: &str) -> Result<Token, ParseError> {
    parse_source(&mut Source::new(text))
}

/// Parse a whole source; the entire input must be comments and sections.
pub fn parse_source(src: &mut Source) -> Result<Token, ParseError> {
    debug!(len = src.len(), eol = %src.eol(), "parsing document");
    let tree = Document::new().parse(src)?;
    debug!(sections = tree.children().len(), "parsed document");
    Ok(tree)
}

/// Parse a seekable reader.
pub fn parse_reader<R>(reader: R, eol: Eol) -> Result<Token, IniError>
where
    R: Read + Seek + 'static,
{
    let mut src = Source::from_reader(reader, eol)?;
    parse_checked(&mut src)
}

/// Parse the file at `path`.
pub fn parse_file(path: impl AsRef<Path>, eol: Eol) -> Result<Token, IniError> {
    let mut src = Source::open(path, eol)?;
    parse_checked(&mut src)
}

/// Parse, reporting a read failure ahead of the parse error it caused.
fn parse_checked(src: &mut Source) -> Result<Token, IniError> {
    let result = parse_source(src);
    if let Some(e) = src.take_io_error() {
        return Err(SourceError::Io(e).into());
    }
    result.map_err(IniError::from)
}
