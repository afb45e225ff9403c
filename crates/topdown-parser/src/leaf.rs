//! Leaf rules: they consume characters and yield leaf tokens.
//!
//! Unless built with `keep_blanks`, a leaf rule first skips whitespace
//! (end-of-line markers included). On failure a leaf rule stops where the
//! mismatch was found; wrap it in an [`Or`](crate::Or) to rewind.

use std::fmt;

use topdown_source::Source;

use crate::rule::Rule;
use crate::token::{LeafBuilder, Token};
use crate::ParseError;

/// Exactly one literal character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Character {
    ch: char,
    keep_blanks: bool,
}

impl Character {
    pub fn new(ch: char) -> Self {
        Self {
            ch,
            keep_blanks: false,
        }
    }

    /// Do not skip leading whitespace.
    pub fn keep_blanks(mut self) -> Self {
        self.keep_blanks = true;
        self
    }
}

impl Rule for Character {
    fn parse(&self, src: &mut Source) -> Result<Token, ParseError> {
        if !self.keep_blanks {
            src.skip_blanks();
        }
        if src.top() != Some(self.ch) {
            return Err(ParseError::at(self, src));
        }
        src.shift();
        Ok(Token::leaf(self.ch))
    }
}

impl fmt::Display for Character {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.ch)
    }
}

/// A literal character sequence.
///
/// A partial match is not rolled back: the cursor stays on the first
/// mismatching character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    text: String,
    keep_blanks: bool,
}

impl Literal {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keep_blanks: false,
        }
    }

    pub fn keep_blanks(mut self) -> Self {
        self.keep_blanks = true;
        self
    }
}

impl Rule for Literal {
    fn parse(&self, src: &mut Source) -> Result<Token, ParseError> {
        if !self.keep_blanks {
            src.skip_blanks();
        }
        for c in self.text.chars() {
            if src.top() != Some(c) {
                return Err(ParseError::at(self, src));
            }
            src.shift();
        }
        Ok(Token::leaf(self.text.as_str()))
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.text)
    }
}

/// Consume the longest non-empty run of characters accepted by `accept`.
fn scan_run(
    rule: &dyn fmt::Display,
    src: &mut Source,
    accept: impl Fn(char) -> bool,
) -> Result<Token, ParseError> {
    if !src.top().is_some_and(&accept) {
        return Err(ParseError::at(rule, src));
    }
    let mut run = LeafBuilder::new();
    while let Some(c) = src.top().filter(|&c| accept(c)) {
        run.push(c);
        src.shift();
    }
    Ok(run.finish())
}

/// A run of decimal digits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Digits {
    keep_blanks: bool,
}

impl Digits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keep_blanks(mut self) -> Self {
        self.keep_blanks = true;
        self
    }
}

impl Rule for Digits {
    fn parse(&self, src: &mut Source) -> Result<Token, ParseError> {
        if !self.keep_blanks {
            src.skip_blanks();
        }
        scan_run(self, src, |c| c.is_ascii_digit())
    }
}

impl fmt::Display for Digits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("digits")
    }
}

/// A run of alphabetic characters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Alphas;

impl Alphas {
    pub fn new() -> Self {
        Self
    }
}

impl Rule for Alphas {
    fn parse(&self, src: &mut Source) -> Result<Token, ParseError> {
        src.skip_blanks();
        scan_run(self, src, char::is_alphabetic)
    }
}

impl fmt::Display for Alphas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("letters")
    }
}

/// A run of alphanumeric characters, plus any of `extra`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Alnums {
    extra: String,
}

impl Alnums {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also accept the characters in `extra` (e.g. `"-_"` for identifiers).
    pub fn with_extra(extra: impl Into<String>) -> Self {
        Self {
            extra: extra.into(),
        }
    }
}

impl Rule for Alnums {
    fn parse(&self, src: &mut Source) -> Result<Token, ParseError> {
        src.skip_blanks();
        scan_run(self, src, |c| c.is_alphanumeric() || self.extra.contains(c))
    }
}

impl fmt::Display for Alnums {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.extra.is_empty() {
            f.write_str("alphanumerics")
        } else {
            write!(f, "alphanumerics or any of {:?}", self.extra)
        }
    }
}

/// Text enclosed between a `head` and a `tail` delimiter.
///
/// Yields the interior verbatim; both delimiters are consumed. After every
/// interior character the tail is tried from a checkpoint and the cursor
/// is rewound when it does not match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    head: Literal,
    tail: Literal,
}

impl Block {
    pub fn new(head: impl Into<String>, tail: impl Into<String>) -> Self {
        Self {
            head: Literal::new(head),
            tail: Literal::new(tail).keep_blanks(),
        }
    }
}

impl Rule for Block {
    fn parse(&self, src: &mut Source) -> Result<Token, ParseError> {
        self.head.parse(src)?;
        let mut interior = LeafBuilder::new();
        while let Some(c) = src.top() {
            let checkpoint = src.save();
            if self.tail.parse(src).is_ok() {
                return Ok(interior.finish());
            }
            src.restore(checkpoint);
            if src.is_eol() {
                interior.push_str(src.eol().as_str());
            } else {
                interior.push(c);
            }
            src.shift();
        }
        Err(ParseError::at(self, src))
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}...{}", self.head, self.tail)
    }
}

/// The rest of the line, up to an optional stop character.
///
/// The terminator (stop character or end-of-line marker) is skipped but not
/// included. Never fails; at end of input it yields an empty leaf.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Line {
    stop: Option<char>,
}

impl Line {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn until(stop: char) -> Self {
        Self { stop: Some(stop) }
    }
}

impl Rule for Line {
    fn parse(&self, src: &mut Source) -> Result<Token, ParseError> {
        let mut text = LeafBuilder::new();
        while let Some(c) = src.top() {
            if Some(c) == self.stop || src.is_eol() {
                break;
            }
            text.push(c);
            src.shift();
        }
        src.shift();
        Ok(text.finish())
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.stop {
            Some(stop) => write!(f, "line up to {stop:?}"),
            None => f.write_str("line"),
        }
    }
}
