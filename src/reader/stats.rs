//! Counters gathered while a table is read.

use serde::Serialize;
use std::fmt;

/// What happened to the input lines of one read.
///
/// `lines_read` counts every line pulled from the source. Of those, each is
/// either skipped (leading skip lines and the header), ignored as blank,
/// rejected with a recorded error, or handed on as a data row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReadStats {
    pub lines_read: u64,
    pub lines_skipped: u64,
    pub blank_lines: u64,
    pub lines_rejected: u64,
    pub rows_ingested: u64,
    pub errors_recorded: u64,
}

impl ReadStats {
    /// Export the counters as pretty-printed JSON.
    ///
    /// # Errors
    /// Propagates `serde_json` serialization failures.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for ReadStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} lines read: {} rows, {} skipped, {} blank, {} rejected, {} errors",
            self.lines_read,
            self.rows_ingested,
            self.lines_skipped,
            self.blank_lines,
            self.lines_rejected,
            self.errors_recorded
        )
    }
}
