//! Error accumulation for tables under construction.
//!
//! An [`ErrorLog`] keeps the first `max_errors` errors it is given and counts
//! every one of them, so a caller can always see the true failure count even
//! after the detail list is full.
//!
//! # Example
//!
//! ```
//! use ironframe::diagnostics::ErrorLog;
//! use ironframe::FrameError;
//!
//! let mut log = ErrorLog::with_max_errors(1);
//! log.record(FrameError::NoNamesGiven);
//! log.record(FrameError::NoTypesGiven);
//!
//! assert_eq!(log.count(), 2);
//! assert_eq!(log.errors().len(), 1);
//! assert!(log.is_saturated());
//! ```

use crate::error::FrameError;
use serde::Serialize;
use std::fmt;

/// Default cap on the number of errors kept in detail.
pub const DEFAULT_MAX_ERRORS: usize = 500;

/// Capped list of errors plus an uncapped counter.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorLog {
    errors: Vec<FrameError>,
    max_errors: usize,
    count: u64,
}

impl Default for ErrorLog {
    fn default() -> Self {
        Self::with_max_errors(DEFAULT_MAX_ERRORS)
    }
}

impl ErrorLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_max_errors(max_errors: usize) -> Self {
        Self {
            errors: Vec::new(),
            max_errors,
            count: 0,
        }
    }

    /// Count the error, and keep it if the list is not yet full.
    pub fn record(&mut self, err: FrameError) {
        self.count += 1;
        if self.errors.len() < self.max_errors {
            self.errors.push(err);
        }
    }

    /// Total number of errors recorded, including those not kept.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.count
    }

    /// The kept errors, oldest first.
    #[must_use]
    pub fn errors(&self) -> &[FrameError] {
        &self.errors
    }

    #[must_use]
    pub fn max_errors(&self) -> usize {
        self.max_errors
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// True once more errors have been counted than kept.
    #[must_use]
    pub fn is_saturated(&self) -> bool {
        self.count > self.errors.len() as u64
    }

    /// A serializable summary of the log.
    #[must_use]
    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            count: self.count,
            kept: self.errors.len(),
            max_errors: self.max_errors,
            errors: self.errors.iter().map(ToString::to_string).collect(),
        }
    }

    /// Export the log as pretty-printed JSON.
    ///
    /// # Errors
    /// Propagates `serde_json` serialization failures.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.report())
    }
}

impl fmt::Display for ErrorLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ErrorLog({} errors, {} kept)", self.count, self.errors.len())
    }
}

/// Serializable form of an [`ErrorLog`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    pub count: u64,
    pub kept: usize,
    pub max_errors: usize,
    pub errors: Vec<String>,
}
