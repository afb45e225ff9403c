use std::fmt;
use std::fs;
use std::io::{self, Read, Seek};
use std::path::Path;

use tracing::trace;

use crate::eol::Eol;
use crate::input::{FileInput, Input, TextInput};
use crate::SourceError;

/// Saved cursor state, handed out by [`Source::save`].
///
/// Checkpoints are independent values: taking a new one never invalidates
/// an older one, so nested backtracking scopes restore correctly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    offset: usize,
    line: usize,
    line_start: usize,
}

impl Checkpoint {
    pub fn offset(&self) -> usize {
        self.offset
    }
}

/// Parsing source.
///
/// Owns the input and a cursor into it. Every rule works on one shared,
/// mutable `Source`; nothing here allocates a new source.
///
/// Invariant: `0 <= offset <= len`. The line counter starts at 1 and only
/// moves when `shift` crosses the configured end-of-line marker.
pub struct Source {
    input: Box<dyn Input>,
    len: usize,
    cursor: usize,
    line: usize,
    line_start: usize,
    eol: Eol,
}

impl Source {
    /// Source over in-memory text with `\n` line endings.
    pub fn new(text: &str) -> Self {
        Self::with_eol(text, Eol::default())
    }

    /// Source over in-memory text with the given line endings.
    pub fn with_eol(text: &str, eol: Eol) -> Self {
        Self::from_input(TextInput::new(text), eol)
    }

    /// Source over any [`Input`] backend.
    pub fn from_input(input: impl Input + 'static, eol: Eol) -> Self {
        let len = input.len();
        Self {
            input: Box::new(input),
            len,
            cursor: 0,
            line: 1,
            line_start: 0,
            eol,
        }
    }

    /// Source over a seekable reader, read one byte at a time on demand.
    pub fn from_reader<R>(reader: R, eol: Eol) -> Result<Self, SourceError>
    where
        R: Read + Seek + 'static,
    {
        let input = FileInput::new(reader)?;
        Ok(Self::from_input(input, eol))
    }

    /// Source over the UTF-8 text file at `path`, read whole into memory.
    ///
    /// Offsets are character offsets, as for [`Source::new`]. Invalid UTF-8
    /// is reported as [`SourceError::Io`].
    pub fn open(path: impl AsRef<Path>, eol: Eol) -> Result<Self, SourceError> {
        let text = fs::read_to_string(path.as_ref())?;
        Ok(Self::with_eol(&text, eol))
    }

    // --- Position ---

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn eol(&self) -> Eol {
        self.eol
    }

    /// Cursor offset, in characters from the start of input.
    pub fn offset(&self) -> usize {
        self.cursor
    }

    /// Current line, 1-based.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Current column, 1-based.
    pub fn column(&self) -> usize {
        self.cursor - self.line_start + 1
    }

    // --- Reading ---

    /// Character under the cursor, `None` at end of input. Never advances.
    pub fn top(&self) -> Option<char> {
        if self.is_eof() {
            None
        } else {
            self.input.char_at(self.cursor)
        }
    }

    pub fn is_eof(&self) -> bool {
        self.cursor >= self.len
    }

    /// Whether the end-of-line marker starts at the cursor.
    pub fn is_eol(&self) -> bool {
        let mut marker = self.eol.as_str().chars();
        match (marker.next(), marker.next()) {
            (Some(only), None) => self.top() == Some(only),
            (Some(first), Some(second)) => {
                self.cursor + 1 < self.len
                    && self.input.char_at(self.cursor) == Some(first)
                    && self.input.char_at(self.cursor + 1) == Some(second)
            }
            (None, _) => false,
        }
    }

    /// Advance past the current character, or past the whole end-of-line
    /// marker (bumping the line counter). No-op at end of input.
    pub fn shift(&mut self) {
        if self.is_eof() {
            return;
        }
        if self.is_eol() {
            self.cursor += self.eol.width();
            self.line += 1;
            self.line_start = self.cursor;
        } else {
            self.cursor += 1;
        }
    }

    /// Skip whitespace, end-of-line markers included.
    pub fn skip_blanks(&mut self) {
        while self.top().is_some_and(char::is_whitespace) {
            self.shift();
        }
    }

    /// Advance up to, but not over, the next end-of-line marker.
    pub fn skip_line(&mut self) {
        while self.top().is_some() && !self.is_eol() {
            self.shift();
        }
    }

    /// Up to `max` characters of unconsumed input on the current line.
    pub fn snippet(&self, max: usize) -> String {
        let first = self.eol.as_str().chars().next();
        (self.cursor..self.len)
            .map_while(|i| self.input.char_at(i))
            .take_while(|&c| Some(c) != first && c != '\n')
            .take(max)
            .collect()
    }

    // --- Backtracking ---

    pub fn save(&self) -> Checkpoint {
        Checkpoint {
            offset: self.cursor,
            line: self.line,
            line_start: self.line_start,
        }
    }

    pub fn restore(&mut self, checkpoint: Checkpoint) {
        debug_assert!(
            checkpoint.offset <= self.len,
            "checkpoint offset {} out of bounds (max {})",
            checkpoint.offset,
            self.len
        );
        if checkpoint.offset != self.cursor {
            trace!(from = self.cursor, to = checkpoint.offset, "restore");
        }
        self.cursor = checkpoint.offset;
        self.line = checkpoint.line;
        self.line_start = checkpoint.line_start;
    }

    /// Take the first I/O failure hit by a reader-backed source.
    pub fn take_io_error(&mut self) -> Option<io::Error> {
        self.input.take_error()
    }
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Source")
            .field("len", &self.len)
            .field("cursor", &self.cursor)
            .field("line", &self.line)
            .field("eol", &self.eol)
            .finish_non_exhaustive()
    }
}
