//! Column type inference over a sample of rows.
//!
//! Every column starts out as possibly bool, int or float. Each sampled field
//! that fails to parse as one of those removes it from the column's
//! [`CandidateSet`]; nothing is ever added back. The surviving candidates are
//! resolved by precedence, bool before int before float, and a column with no
//! candidates left is text.
//!
//! ```
//! use ironframe::ColumnType;
//! use ironframe::reader::infer::infer_column_types;
//!
//! let rows = vec![vec!["true", "1", "1.5", "x"], vec!["0", "-7", "2", "y"]];
//! let pinned = [ColumnType::Unknown; 4];
//! assert_eq!(
//!     infer_column_types(&pinned, &rows),
//!     vec![ColumnType::Bool, ColumnType::Int, ColumnType::Float, ColumnType::Text]
//! );
//! ```

use crate::types::ColumnType;
use crate::value::{parse_bool, parse_float, parse_int};

const BOOL: u8 = 1 << 0;
const INT: u8 = 1 << 1;
const FLOAT: u8 = 1 << 2;

/// The types a column could still have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateSet(u8);

impl Default for CandidateSet {
    fn default() -> Self {
        Self::ALL
    }
}

impl CandidateSet {
    /// Bool, int and float. Text is the fallback, never a candidate.
    pub const ALL: Self = Self(BOOL | INT | FLOAT);

    /// Drop every candidate that `text` does not parse as.
    pub fn observe(&mut self, text: &str) {
        if self.0 & BOOL != 0 && parse_bool(text).is_err() {
            self.0 &= !BOOL;
        }
        if self.0 & INT != 0 && parse_int(text).is_err() {
            self.0 &= !INT;
        }
        if self.0 & FLOAT != 0 && parse_float(text).is_err() {
            self.0 &= !FLOAT;
        }
    }

    #[must_use]
    pub fn contains(self, column_type: ColumnType) -> bool {
        let bit = match column_type {
            ColumnType::Bool => BOOL,
            ColumnType::Int => INT,
            ColumnType::Float => FLOAT,
            ColumnType::Text | ColumnType::Unknown => return false,
        };
        self.0 & bit != 0
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// The highest-precedence surviving candidate, or text.
    #[must_use]
    pub fn resolve(self) -> ColumnType {
        [ColumnType::Bool, ColumnType::Int, ColumnType::Float]
            .into_iter()
            .find(|&t| self.contains(t))
            .unwrap_or(ColumnType::Text)
    }
}

/// One concrete type per column.
///
/// `pinned` holds the types already known, one per column; any concrete entry
/// is kept as is and only [`ColumnType::Unknown`] entries are inferred from
/// `rows`. Fields beyond `pinned.len()` are ignored.
#[must_use]
pub fn infer_column_types<S: AsRef<str>>(pinned: &[ColumnType], rows: &[Vec<S>]) -> Vec<ColumnType> {
    let mut candidates = vec![CandidateSet::ALL; pinned.len()];
    for row in rows {
        for (set, field) in candidates.iter_mut().zip(row) {
            set.observe(field.as_ref());
        }
    }

    pinned
        .iter()
        .zip(candidates)
        .map(|(&known, set)| {
            if known.is_concrete() {
                known
            } else {
                set.resolve()
            }
        })
        .collect()
}
