//! Topdown Parser
//!
//! A small toolkit of composable grammar rules for top-down backtracking
//! parsing. Rules read characters straight from a shared
//! [`Source`](topdown_source::Source); there is no separate lexing pass.
//!
//! Leaf rules ([`Character`], [`Literal`], [`Digits`], [`Alphas`],
//! [`Alnums`], [`Block`], [`Line`]) consume characters and yield leaf
//! tokens. Composite rules ([`And`], [`Or`], [`Many`], [`Repeat`],
//! [`List`]) combine child rules into node tokens.
//!
//! # Example
//!
//! ```
//! use topdown_parser::{Literal, Or, Rule, RuleExt};
//! use topdown_source::Source;
//!
//! let rule = Or::new([Literal::new("foo").boxed(), Literal::new("bar").boxed()]);
//! let mut src = Source::new("bar");
//! assert_eq!(rule.parse(&mut src).unwrap(), "bar");
//! assert!(src.is_eof());
//! ```

pub mod combinator;
pub mod leaf;
pub mod rule;
pub mod token;

use std::fmt;

use topdown_source::Source;

pub use combinator::{And, List, Many, Or, Repeat};
pub use leaf::{Alnums, Alphas, Block, Character, Digits, Line, Literal};
pub use rule::{BoxedRule, Rule, RuleExt};
pub use token::{LeafBuilder, Node, NodeBuilder, Token};

/// Longest stretch of remaining input kept on a [`ParseError`].
const SNIPPET_LEN: usize = 24;

/// A rule failed to match.
///
/// Carries the failing rule's description and where the source stood when
/// it gave up.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: at pos {offset}, '{}': expected {expected}", found_text(.found))]
pub struct ParseError {
    pub expected: String,
    pub line: usize,
    pub offset: usize,
    pub column: usize,
    /// Character under the cursor, `None` at end of input.
    pub found: Option<char>,
    /// Unconsumed input on the failing line.
    pub snippet: String,
}

impl ParseError {
    /// Error for `rule` at the source's current position.
    pub fn at(rule: &dyn fmt::Display, src: &Source) -> Self {
        Self {
            expected: rule.to_string(),
            line: src.line(),
            offset: src.offset(),
            column: src.column(),
            found: src.top(),
            snippet: src.snippet(SNIPPET_LEN),
        }
    }

    pub fn is_eof(&self) -> bool {
        self.found.is_none()
    }
}

fn found_text(found: &Option<char>) -> String {
    found.map_or_else(|| "(eof)".to_string(), String::from)
}

/// Misuse of the token-append operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("cannot append to pair token '{key}'")]
    AppendToPair { key: String },

    #[error("cannot append a {found} token to a leaf")]
    NotText { found: &'static str },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let mut src = Source::new("ab\ncd");
        src.shift();
        let err = ParseError::at(&"'x'", &src);
        assert_eq!(err.to_string(), "line 1: at pos 1, 'b': expected 'x'");
        assert_eq!(err.column, 2);
        assert_eq!(err.snippet, "b");
    }

    #[test]
    fn test_error_display_at_eof() {
        let mut src = Source::new("a\n");
        src.shift();
        src.shift();
        let err = ParseError::at(&"digits", &src);
        assert!(err.is_eof());
        assert_eq!(err.to_string(), "line 2: at pos 2, '(eof)': expected digits");
    }
}
