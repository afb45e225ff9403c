//! The rule abstraction shared by leaf and composite rules.

use std::fmt;

use topdown_source::Source;

use crate::token::Token;
use crate::ParseError;

/// One grammar production.
///
/// A rule is an immutable description of what to match; parsing never
/// changes it, so one rule value can be applied any number of times.
/// `Display` gives the description quoted in [`ParseError`]s.
pub trait Rule: fmt::Display {
    /// Match at the source's cursor, advancing it past what was consumed.
    ///
    /// On failure the cursor may have moved; only [`Or`](crate::Or),
    /// [`Many`](crate::Many) and [`List`](crate::List) rewind it.
    fn parse(&self, src: &mut Source) -> Result<Token, ParseError>;
}

pub type BoxedRule = Box<dyn Rule>;

impl Rule for BoxedRule {
    fn parse(&self, src: &mut Source) -> Result<Token, ParseError> {
        (**self).parse(src)
    }
}

/// Conversion helpers available on every rule.
pub trait RuleExt: Rule + Sized + 'static {
    fn boxed(self) -> BoxedRule {
        Box::new(self)
    }
}

impl<R: Rule + 'static> RuleExt for R {}

/// Write `rules` as a comma separated, parenthesized list.
pub(crate) fn write_rules(f: &mut fmt::Formatter<'_>, rules: &[BoxedRule]) -> fmt::Result {
    f.write_str("(")?;
    for (i, rule) in rules.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{rule}")?;
    }
    f.write_str(")")
}
