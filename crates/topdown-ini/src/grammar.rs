//! The configuration grammar.
//!
//! ```text
//! document := (comment | section)*            until end of input
//! section  := "[" name "]" (pair | comment)*
//! pair     := key ("=" | ":") line ("\t" line)*
//! comment  := "#" rest-of-line
//! ```
//!
//! All four rules are stateless and can be reused across parses.

use std::fmt;

use topdown_parser::{
    Alnums, Block, BoxedRule, Character, Line, Many, Or, ParseError, Repeat, Rule, RuleExt, Token,
};
use topdown_source::Source;

/// Characters allowed in a key besides letters and digits.
const KEY_EXTRA: &str = "-_";

/// A `#` comment running to the end of the line. Yields an empty token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Comment;

impl Rule for Comment {
    fn parse(&self, src: &mut Source) -> Result<Token, ParseError> {
        src.skip_blanks();
        if src.top() != Some('#') {
            return Err(ParseError::at(self, src));
        }
        src.skip_line();
        Ok(Token::empty())
    }
}

impl fmt::Display for Comment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("comment")
    }
}

/// `key = value` or `key: value`, yielding a pair token.
///
/// Lines starting with a tab continue the value; pieces are joined with a
/// single space and the result is trimmed. A continuation never reaches past
/// its own line, so a blank tab-indented line ends the value.
pub struct Pair {
    key: Alnums,
    assign: Or,
    value: Line,
}

impl Pair {
    pub fn new() -> Self {
        Self {
            key: Alnums::with_extra(KEY_EXTRA),
            assign: Or::new([Character::new('=').boxed(), Character::new(':').boxed()]),
            value: Line::new(),
        }
    }
}

impl Default for Pair {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for Pair {
    fn parse(&self, src: &mut Source) -> Result<Token, ParseError> {
        let key = self.key.parse(src)?.into_string();
        self.assign.parse(src)?;
        let mut value = self.value.parse(src)?.into_string();
        while src.top() == Some('\t') {
            while matches!(src.top(), Some(' ' | '\t')) {
                src.shift();
            }
            value.push(' ');
            value.push_str(&self.value.parse(src)?.into_string());
        }
        Ok(Token::pair(key, value.trim()))
    }
}

impl fmt::Display for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("key/value pair")
    }
}

/// `[name]` followed by its pairs, yielding a node named after the section.
pub struct Section {
    name: Block,
    entries: Many,
}

impl Section {
    pub fn new() -> Self {
        let entry = Or::new([Pair::new().boxed(), Comment.boxed()]);
        Self {
            name: Block::new("[", "]"),
            entries: Many::new(entry.boxed()),
        }
    }
}

impl Default for Section {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for Section {
    fn parse(&self, src: &mut Source) -> Result<Token, ParseError> {
        src.skip_blanks();
        let name = self.name.parse(src)?.into_string();
        let entries = self.entries.parse(src)?;
        Ok(Token::node(name, entries.into_children()))
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("section")
    }
}

/// A whole document: comments and sections until end of input.
///
/// Leading whitespace is skipped, so blank input is an empty document.
pub struct Document {
    body: Repeat,
}

impl Document {
    pub fn new() -> Self {
        let item: BoxedRule = Or::new([Comment.boxed(), Section::new().boxed()]).boxed();
        Self {
            body: Repeat::new(item),
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for Document {
    fn parse(&self, src: &mut Source) -> Result<Token, ParseError> {
        src.skip_blanks();
        self.body.parse(src)
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("document")
    }
}
