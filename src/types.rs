//! Logical column types.

use crate::error::{FrameError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The logical type of a column, and so which typed storage array holds its
/// values.
///
/// `Unknown` only exists while a table is being built (names known, types not
/// yet inferred). It is never a legal type for a registered column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    #[default]
    Unknown,
    Bool,
    Int,
    Float,
    Text,
}

impl ColumnType {
    /// The four concrete column types in inference precedence order.
    pub const CONCRETE: [ColumnType; 4] = [Self::Bool, Self::Int, Self::Float, Self::Text];

    /// Numeric code of the first value past the valid range.
    pub const GUARD_CODE: u8 = 5;

    /// True for `Bool`, `Int`, `Float` and `Text`.
    #[must_use]
    pub fn is_concrete(self) -> bool {
        self != Self::Unknown
    }

    /// Stable numeric code (`Unknown` is 0).
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::Unknown => 0,
            Self::Bool => 1,
            Self::Int => 2,
            Self::Float => 3,
            Self::Text => 4,
        }
    }

    /// Convert a numeric code back into a type.
    ///
    /// # Errors
    /// Returns [`FrameError::ColumnTypeCode`] for codes at or past
    /// [`GUARD_CODE`](Self::GUARD_CODE).
    pub fn from_code(code: u8) -> Result<Self> {
        match code {
            0 => Ok(Self::Unknown),
            1 => Ok(Self::Bool),
            2 => Ok(Self::Int),
            3 => Ok(Self::Float),
            4 => Ok(Self::Text),
            _ => Err(FrameError::ColumnTypeCode(code)),
        }
    }

    /// Lowercase name, as used in messages and serialized configuration.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Text => "text",
        }
    }
}

impl TryFrom<u8> for ColumnType {
    type Error = FrameError;

    fn try_from(code: u8) -> Result<Self> {
        Self::from_code(code)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
