//! Source positions used to prefix line errors.

use std::fmt;

/// Where in the input a line came from: the source label given to the read
/// plus a 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    source: String,
    line: u64,
}

impl Location {
    /// Positioned before the first line.
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            line: 0,
        }
    }

    /// Move on to the next line.
    pub fn advance(&mut self) {
        self.line += 1;
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn line(&self) -> u64 {
        self.line
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.source, self.line)
    }
}
