//! Composite rules: sequence, ordered choice, repetition and lists.
//!
//! Only [`Or`], [`Many`] and [`List`] (for its separator) backtrack. Each
//! takes its own [`Checkpoint`](topdown_source::Checkpoint) value, so they
//! nest freely.

use std::fmt;

use topdown_source::Source;
use tracing::trace;

use crate::rule::{write_rules, BoxedRule, Rule};
use crate::token::{NodeBuilder, Token};
use crate::ParseError;

/// Every rule in order, against the same source.
///
/// Yields a `<and>` node of the children's tokens. No backtracking: when a
/// later rule fails, input consumed by the earlier ones stays consumed.
pub struct And {
    rules: Vec<BoxedRule>,
}

impl And {
    pub fn new(rules: impl IntoIterator<Item = BoxedRule>) -> Self {
        Self {
            rules: rules.into_iter().collect(),
        }
    }
}

impl Rule for And {
    fn parse(&self, src: &mut Source) -> Result<Token, ParseError> {
        let mut node = NodeBuilder::new("<and>");
        for rule in &self.rules {
            node.push(rule.parse(src)?);
        }
        Ok(node.finish())
    }
}

impl fmt::Display for And {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("sequence of ")?;
        write_rules(f, &self.rules)
    }
}

/// Ordered choice: the first alternative that matches wins.
///
/// Alternatives are tried in order from the same checkpoint; a later one is
/// never attempted once an earlier one succeeds. When all fail the error
/// names the `Or` itself, at the checkpoint position.
pub struct Or {
    rules: Vec<BoxedRule>,
}

impl Or {
    pub fn new(rules: impl IntoIterator<Item = BoxedRule>) -> Self {
        Self {
            rules: rules.into_iter().collect(),
        }
    }
}

impl Rule for Or {
    fn parse(&self, src: &mut Source) -> Result<Token, ParseError> {
        let checkpoint = src.save();
        for rule in &self.rules {
            match rule.parse(src) {
                Ok(token) => return Ok(token),
                Err(e) => {
                    trace!(alternative = %rule, error = %e, "alternative failed");
                    src.restore(checkpoint);
                }
            }
        }
        Err(ParseError::at(self, src))
    }
}

impl fmt::Display for Or {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("one of ")?;
        write_rules(f, &self.rules)
    }
}

/// Zero or more matches of a rule. Never fails.
///
/// Each attempt starts from a fresh checkpoint; the first failure is
/// rewound and ends the repetition. An attempt that matches without
/// consuming input also ends it.
pub struct Many {
    rule: BoxedRule,
}

impl Many {
    pub fn new(rule: BoxedRule) -> Self {
        Self { rule }
    }
}

impl Rule for Many {
    fn parse(&self, src: &mut Source) -> Result<Token, ParseError> {
        let mut node = NodeBuilder::new("<many>");
        loop {
            let checkpoint = src.save();
            match self.rule.parse(src) {
                Ok(token) => {
                    node.push(token);
                    if src.offset() == checkpoint.offset() {
                        break;
                    }
                }
                Err(e) => {
                    trace!(count = node.len(), error = %e, "many stopped");
                    src.restore(checkpoint);
                    break;
                }
            }
        }
        Ok(node.finish())
    }
}

impl fmt::Display for Many {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "zero or more {}", self.rule)
    }
}

/// Matches of a rule until end of input, whitespace skipped in between.
///
/// Every iteration must succeed: a failure propagates as is. An iteration
/// that consumes nothing fails the `Repeat`.
pub struct Repeat {
    rule: BoxedRule,
}

impl Repeat {
    pub fn new(rule: BoxedRule) -> Self {
        Self { rule }
    }
}

impl Rule for Repeat {
    fn parse(&self, src: &mut Source) -> Result<Token, ParseError> {
        let mut node = NodeBuilder::new("<repeat>");
        while src.top().is_some() {
            let before = src.offset();
            node.push(self.rule.parse(src)?);
            if src.offset() == before {
                return Err(ParseError::at(self, src));
            }
            src.skip_blanks();
        }
        Ok(node.finish())
    }
}

impl fmt::Display for Repeat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} until end of input", self.rule)
    }
}

/// One or more items separated by a separator rule.
///
/// The separator is tried from a checkpoint; when it fails the list ends
/// there. Separator tokens are discarded. Fails only if an item fails.
pub struct List {
    item: BoxedRule,
    separator: BoxedRule,
}

impl List {
    pub fn new(item: BoxedRule, separator: BoxedRule) -> Self {
        Self { item, separator }
    }
}

impl Rule for List {
    fn parse(&self, src: &mut Source) -> Result<Token, ParseError> {
        let mut node = NodeBuilder::new("<list>");
        loop {
            node.push(self.item.parse(src)?);
            let checkpoint = src.save();
            if let Err(e) = self.separator.parse(src) {
                trace!(count = node.len(), error = %e, "list ended");
                src.restore(checkpoint);
                return Ok(node.finish());
            }
        }
    }
}

impl fmt::Display for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "list of {} separated by {}", self.item, self.separator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaf::{Character, Digits, Line, Literal};
    use crate::rule::RuleExt;
    use pretty_assertions::assert_eq;

    fn lit(s: &str) -> BoxedRule {
        Literal::new(s).boxed()
    }

    // =========================================================================
    // And
    // =========================================================================

    #[test]
    fn test_and_sequence() {
        let mut src = Source::new("foo bar baz");
        let rule = And::new([lit("foo"), lit("bar"), lit("baz")]);
        let token = rule.parse(&mut src).unwrap();
        assert_eq!(token.name(), Some("<and>"));
        assert_eq!(token.children(), ["foo", "bar", "baz"]);
        assert!(src.is_eof());
    }

    #[test]
    fn test_and_keeps_partial_consumption() {
        let mut src = Source::new("foo qux");
        let rule = And::new([lit("foo"), lit("bar")]);
        let err = rule.parse(&mut src).unwrap_err();
        assert_eq!(err.expected, "\"bar\"");
        assert_eq!(src.offset(), 4);
    }

    // =========================================================================
    // Or
    // =========================================================================

    #[test]
    fn test_or_picks_matching_alternative() {
        let mut src = Source::new("bar");
        let rule = Or::new([lit("foo"), lit("bar"), lit("baz")]);
        assert_eq!(rule.parse(&mut src).unwrap(), "bar");
        assert!(src.is_eof());
    }

    #[test]
    fn test_or_is_first_match() {
        let mut src = Source::new("foobar");
        let rule = Or::new([lit("foo"), lit("foobar")]);
        assert_eq!(rule.parse(&mut src).unwrap(), "foo");
        assert_eq!(src.top(), Some('b'));
    }

    #[test]
    fn test_or_failure_names_itself_at_checkpoint() {
        let mut src = Source::new("bat");
        let rule = Or::new([lit("bar"), lit("baz")]);
        let err = rule.parse(&mut src).unwrap_err();
        assert_eq!(err.offset, 0);
        assert_eq!(err.expected, "one of (\"bar\", \"baz\")");
        assert_eq!(src.offset(), 0);
    }

    #[test]
    fn test_nested_backtracking_restores_outer_checkpoint() {
        // The inner Or saves at offset 1 while the outer one still holds
        // offset 0; the outer rewind must still land on 0.
        let mut src = Source::new("az");
        let inner = Or::new([lit("x"), lit("y")]);
        let first = And::new([Character::new('a').boxed(), inner.boxed()]);
        let rule = Or::new([first.boxed(), lit("az")]);
        assert_eq!(rule.parse(&mut src).unwrap(), "az");
        assert!(src.is_eof());
    }

    // =========================================================================
    // Many
    // =========================================================================

    #[test]
    fn test_many_zero_matches() {
        let mut src = Source::new("xyz");
        let token = Many::new(lit("a")).parse(&mut src).unwrap();
        assert_eq!(token.name(), Some("<many>"));
        assert!(token.children().is_empty());
        assert_eq!(src.offset(), 0);
    }

    #[test]
    fn test_many_stops_and_rewinds() {
        let mut src = Source::new("ab ab ac");
        let token = Many::new(lit("ab")).parse(&mut src).unwrap();
        assert_eq!(token.children(), ["ab", "ab"]);
        assert_eq!(src.offset(), 5);
    }

    #[test]
    fn test_many_stops_on_empty_match() {
        let mut src = Source::new("");
        let token = Many::new(Line::new().boxed()).parse(&mut src).unwrap();
        assert!(token.children().is_empty());
    }

    // =========================================================================
    // Repeat
    // =========================================================================

    #[test]
    fn test_repeat_until_eof() {
        let mut src = Source::new("bar bar bar bar");
        let token = Repeat::new(lit("bar")).parse(&mut src).unwrap();
        assert_eq!(token.children(), ["bar"; 4]);
        assert_eq!(src.top(), None);
    }

    #[test]
    fn test_repeat_propagates_failure() {
        let mut src = Source::new("bar baz");
        let err = Repeat::new(lit("bar")).parse(&mut src).unwrap_err();
        assert_eq!(err.found, Some('z'));
    }

    #[test]
    fn test_repeat_skips_trailing_blanks() {
        let mut src = Source::new("1 2\n\n");
        let token = Repeat::new(Digits::new().boxed()).parse(&mut src).unwrap();
        assert_eq!(token.children(), ["1", "2"]);
    }

    #[test]
    fn test_repeat_without_progress_fails() {
        let mut src = Source::new("x");
        let rule = Repeat::new(Many::new(lit("y")).boxed());
        let err = rule.parse(&mut src).unwrap_err();
        assert!(err.expected.ends_with("until end of input"));
    }

    // =========================================================================
    // List
    // =========================================================================

    #[test]
    fn test_list_items() {
        let mut src = Source::new("1, 22 ,333;");
        let rule = List::new(Digits::new().boxed(), Character::new(',').boxed());
        let token = rule.parse(&mut src).unwrap();
        assert_eq!(token.name(), Some("<list>"));
        assert_eq!(token.children(), ["1", "22", "333"]);
        assert_eq!(src.top(), Some(';'));
    }

    #[test]
    fn test_list_single_item() {
        let mut src = Source::new("7");
        let rule = List::new(Digits::new().boxed(), Character::new(',').boxed());
        assert_eq!(rule.parse(&mut src).unwrap().children(), ["7"]);
    }

    #[test]
    fn test_list_requires_first_item() {
        let mut src = Source::new(",1");
        let rule = List::new(Digits::new().boxed(), Character::new(',').boxed());
        assert!(rule.parse(&mut src).is_err());
    }

    #[test]
    fn test_list_item_after_separator_must_match() {
        let mut src = Source::new("1,x");
        let rule = List::new(Digits::new().boxed(), Character::new(',').boxed());
        let err = rule.parse(&mut src).unwrap_err();
        assert_eq!(err.found, Some('x'));
    }
}
