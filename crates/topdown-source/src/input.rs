//! Random-access character inputs backing a [`Source`](crate::Source).

use std::cell::RefCell;
use std::io::{self, Read, Seek, SeekFrom};

use tracing::warn;

/// Indexable, fixed-length character input.
pub trait Input {
    /// Number of characters available.
    fn len(&self) -> usize;

    /// Character at `index`, or `None` past the end.
    fn char_at(&self, index: usize) -> Option<char>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Take the first I/O failure seen while reading, if any.
    fn take_error(&self) -> Option<io::Error> {
        None
    }
}

/// In-memory text, indexed by character.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    chars: Vec<char>,
}

impl TextInput {
    pub fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
        }
    }
}

impl From<&str> for TextInput {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for TextInput {
    fn from(text: String) -> Self {
        Self::new(&text)
    }
}

impl Input for TextInput {
    fn len(&self) -> usize {
        self.chars.len()
    }

    fn char_at(&self, index: usize) -> Option<char> {
        self.chars.get(index).copied()
    }
}

/// Bytes loaded per reader access.
const WINDOW: usize = 4096;

/// Seekable byte reader, loaded one aligned window at a time.
///
/// Each byte maps to exactly one `char` (latin-1 style), so offsets are byte
/// offsets; use [`Source::open`](crate::Source::open) for UTF-8 text files.
/// Accesses inside the current window never touch the reader. A failed read
/// looks like end-of-input to the parser; the error is kept and can be taken
/// afterwards with [`Input::take_error`].
#[derive(Debug)]
pub struct FileInput<R> {
    reader: RefCell<R>,
    len: usize,
    window: RefCell<Window>,
    error: RefCell<Option<io::Error>>,
}

#[derive(Debug, Default)]
struct Window {
    start: usize,
    bytes: Vec<u8>,
}

impl Window {
    fn get(&self, index: usize) -> Option<u8> {
        index
            .checked_sub(self.start)
            .and_then(|i| self.bytes.get(i))
            .copied()
    }
}

impl<R: Read + Seek> FileInput<R> {
    /// Wrap `reader`, measuring its length by seeking to the end.
    pub fn new(mut reader: R) -> io::Result<Self> {
        let end = reader.seek(SeekFrom::End(0))?;
        let len = usize::try_from(end).map_err(io::Error::other)?;
        Ok(Self {
            reader: RefCell::new(reader),
            len,
            window: RefCell::new(Window::default()),
            error: RefCell::new(None),
        })
    }

    /// Byte at `index < len`, refilling the window on a miss.
    fn read_byte(&self, index: usize) -> io::Result<u8> {
        let mut window = self.window.borrow_mut();
        if let Some(byte) = window.get(index) {
            return Ok(byte);
        }
        let start = index - index % WINDOW;
        let size = WINDOW.min(self.len - start);
        window.bytes.clear();
        window.bytes.resize(size, 0);
        window.start = start;

        if let Err(e) = self.fill(&mut window.bytes, start) {
            window.bytes.clear();
            return Err(e);
        }
        Ok(window.bytes[index - start])
    }

    fn fill(&self, buf: &mut [u8], start: usize) -> io::Result<()> {
        let mut reader = self.reader.borrow_mut();
        reader.seek(SeekFrom::Start(start as u64))?;
        reader.read_exact(buf)
    }
}

impl<R: Read + Seek> Input for FileInput<R> {
    fn len(&self) -> usize {
        self.len
    }

    fn char_at(&self, index: usize) -> Option<char> {
        if index >= self.len {
            return None;
        }
        match self.read_byte(index) {
            Ok(byte) => Some(char::from(byte)),
            Err(e) => {
                warn!(index, error = %e, "read failed, treating as end of input");
                let mut slot = self.error.borrow_mut();
                if slot.is_none() {
                    *slot = Some(e);
                }
                None
            }
        }
    }

    fn take_error(&self) -> Option<io::Error> {
        self.error.borrow_mut().take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Reader that reports a length but fails every read.
    struct Broken;

    impl Read for Broken {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "gone"))
        }
    }

    impl Seek for Broken {
        fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
            match pos {
                SeekFrom::End(_) => Ok(4),
                _ => Ok(0),
            }
        }
    }

    #[test]
    fn test_text_input_indexes_chars() {
        let input = TextInput::from("héllo");
        assert_eq!(input.len(), 5);
        assert_eq!(input.char_at(1), Some('é'));
        assert_eq!(input.char_at(5), None);
    }

    #[test]
    fn test_empty_text_input() {
        let input = TextInput::default();
        assert!(input.is_empty());
        assert_eq!(input.char_at(0), None);
    }

    #[test]
    fn test_file_input_random_access() {
        let input = FileInput::new(Cursor::new(b"abc".to_vec())).unwrap();
        assert_eq!(input.len(), 3);
        assert_eq!(input.char_at(2), Some('c'));
        assert_eq!(input.char_at(0), Some('a'));
        assert_eq!(input.char_at(3), None);
        assert!(input.take_error().is_none());
    }

    #[test]
    fn test_file_input_across_windows() {
        let data: Vec<u8> = (0..WINDOW * 2 + 10).map(|i| b'a' + (i % 26) as u8).collect();
        let input = FileInput::new(Cursor::new(data.clone())).unwrap();
        for index in [WINDOW + 3, 1, WINDOW * 2 + 9, WINDOW - 1, WINDOW] {
            assert_eq!(input.char_at(index), Some(char::from(data[index])));
        }
        assert_eq!(input.char_at(data.len()), None);
    }

    #[test]
    fn test_file_input_keeps_first_error() {
        let input = FileInput::new(Broken).unwrap();
        assert_eq!(input.len(), 4);
        assert_eq!(input.char_at(0), None);
        assert_eq!(input.char_at(1), None);
        let err = input.take_error().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert!(input.take_error().is_none());
    }
}
