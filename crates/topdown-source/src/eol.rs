use std::fmt;
use std::str::FromStr;

use crate::SourceError;

/// End-of-line conventions a [`Source`](crate::Source) can be configured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Eol {
    /// `\n` (unix and friends)
    #[default]
    Lf,
    /// `\r` (classic mac)
    Cr,
    /// `\n\r`
    LfCr,
    /// `\r\n` (windows)
    CrLf,
    /// `\x1E` record separator (old QNX)
    Rs,
}

impl Eol {
    pub const ALL: [Eol; 5] = [Eol::Lf, Eol::Cr, Eol::LfCr, Eol::CrLf, Eol::Rs];

    /// The marker text.
    pub fn as_str(self) -> &'static str {
        match self {
            Eol::Lf => "\n",
            Eol::Cr => "\r",
            Eol::LfCr => "\n\r",
            Eol::CrLf => "\r\n",
            Eol::Rs => "\x1E",
        }
    }

    /// Number of characters in the marker (1 or 2).
    pub fn width(self) -> usize {
        match self {
            Eol::LfCr | Eol::CrLf => 2,
            Eol::Lf | Eol::Cr | Eol::Rs => 1,
        }
    }

    /// Short lowercase name, as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            Eol::Lf => "lf",
            Eol::Cr => "cr",
            Eol::LfCr => "lfcr",
            Eol::CrLf => "crlf",
            Eol::Rs => "rs",
        }
    }
}

impl fmt::Display for Eol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Eol {
    type Err = SourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        Eol::ALL
            .into_iter()
            .find(|eol| eol.name() == lowered)
            .ok_or_else(|| SourceError::UnknownEol(s.to_string()))
    }
}
