//! Typed cell values.
//!
//! Each concrete [`ColumnType`] has a wrapper holding the scalar and an
//! "unavailable" flag. Parsing text into a wrapper never fails past the
//! wrapper: on a bad cell the wrapper is marked unavailable and the
//! [`ParseValueError`] is handed back so the caller can record it.
//!
//! The text rules are deliberately liberal and match common data-file
//! conventions:
//! - booleans: `1 t T TRUE true True 0 f F FALSE false False`
//! - integers: optional sign, `0x`/`0o`/`0b` prefixes, a leading `0` for
//!   octal, and `_` between digits
//! - floats: decimal and exponent forms, `inf`/`infinity`/`nan` in any case,
//!   and `_` between digits; a finite literal that overflows is rejected

use crate::storage::Lane;
use crate::types::ColumnType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::IntErrorKind;
use thiserror::Error;

const INVALID_SYNTAX: &str = "invalid syntax";
const OUT_OF_RANGE: &str = "value out of range";

/// A cell that could not be parsed as the column's type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot parse {text:?} as {wanted}: {reason}")]
pub struct ParseValueError {
    pub wanted: ColumnType,
    pub text: String,
    pub reason: &'static str,
}

impl ParseValueError {
    fn new(wanted: ColumnType, text: &str, reason: &'static str) -> Self {
        Self {
            wanted,
            text: text.to_string(),
            reason,
        }
    }
}

/// Parse a boolean the way data files usually spell one.
///
/// # Errors
/// Returns a [`ParseValueError`] for anything outside the accepted spellings.
pub fn parse_bool(text: &str) -> Result<bool, ParseValueError> {
    match text {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(ParseValueError::new(ColumnType::Bool, text, INVALID_SYNTAX)),
    }
}

/// Parse a signed 64-bit integer, honouring base prefixes.
///
/// # Errors
/// Returns a [`ParseValueError`] on bad syntax or when the value does not fit
/// in an `i64`.
pub fn parse_int(text: &str) -> Result<i64, ParseValueError> {
    let invalid = || ParseValueError::new(ColumnType::Int, text, INVALID_SYNTAX);
    let out_of_range = || ParseValueError::new(ColumnType::Int, text, OUT_OF_RANGE);

    let (negative, body) = match text.as_bytes().first() {
        Some(b'+') => (false, &text[1..]),
        Some(b'-') => (true, &text[1..]),
        _ => (false, text),
    };

    let prefix = body.get(..2).map(str::to_ascii_lowercase);
    let (radix, digits, prefixed) = match prefix.as_deref() {
        Some("0x") => (16, &body[2..], true),
        Some("0o") => (8, &body[2..], true),
        Some("0b") => (2, &body[2..], true),
        _ if body.len() > 1 && body.starts_with('0') => (8, &body[1..], true),
        _ => (10, body, false),
    };

    let cleaned;
    let digits = if digits.contains('_') {
        if !underscores_between_digits(digits, prefixed) {
            return Err(invalid());
        }
        cleaned = digits.replace('_', "");
        cleaned.as_str()
    } else {
        digits
    };

    // from_str_radix tolerates a sign of its own; we have already taken it
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return Err(invalid());
    }

    let magnitude = u64::from_str_radix(digits, radix).map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow => out_of_range(),
        _ => invalid(),
    })?;

    if negative {
        0i64.checked_sub_unsigned(magnitude).ok_or_else(out_of_range)
    } else {
        i64::try_from(magnitude).map_err(|_| out_of_range())
    }
}

/// Parse a 64-bit float.
///
/// # Errors
/// Returns a [`ParseValueError`] on bad syntax or when a finite literal
/// overflows to infinity.
pub fn parse_float(text: &str) -> Result<f64, ParseValueError> {
    let invalid = || ParseValueError::new(ColumnType::Float, text, INVALID_SYNTAX);

    let cleaned;
    let candidate = if text.contains('_') {
        let bytes = text.as_bytes();
        let separated = bytes.iter().enumerate().all(|(i, &b)| {
            b != b'_'
                || (i > 0
                    && bytes[i - 1].is_ascii_digit()
                    && bytes.get(i + 1).is_some_and(u8::is_ascii_digit))
        });
        if !separated {
            return Err(invalid());
        }
        cleaned = text.replace('_', "");
        cleaned.as_str()
    } else {
        text
    };

    let value: f64 = candidate.parse().map_err(|_| invalid())?;
    if value.is_infinite() {
        let word = candidate.trim_start_matches(['+', '-']).to_ascii_lowercase();
        if word != "inf" && word != "infinity" {
            return Err(ParseValueError::new(ColumnType::Float, text, OUT_OF_RANGE));
        }
    }
    Ok(value)
}

/// Underscores may only separate digits, or follow a base prefix.
fn underscores_between_digits(digits: &str, prefixed: bool) -> bool {
    let mut allowed = prefixed;
    for c in digits.chars() {
        if c == '_' {
            if !allowed {
                return false;
            }
            allowed = false;
        } else {
            allowed = true;
        }
    }
    !digits.ends_with('_')
}

/// A boolean cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoolVal {
    pub value: bool,
    pub unavailable: bool,
}

/// An integer cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntVal {
    pub value: i64,
    pub unavailable: bool,
}

/// A floating-point cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FloatVal {
    pub value: f64,
    pub unavailable: bool,
}

/// A text cell. Text never fails to parse; it is only unavailable when it
/// stands in for a missing row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextVal {
    pub value: String,
    pub unavailable: bool,
}

/// The behaviour shared by the four cell wrappers.
///
/// This trait is sealed; it is what lets the table, row and column accessors
/// be generic over the cell type while keeping one dense array per type.
pub trait CellValue: Lane + Clone + Default + fmt::Debug + PartialEq {
    /// The column type whose storage holds this wrapper.
    const COLUMN_TYPE: ColumnType;

    /// The unavailable ("NA") value.
    fn unavailable() -> Self;

    /// Parse a text cell.
    ///
    /// # Errors
    /// Returns the parse failure; callers store [`unavailable`](Self::unavailable) instead.
    fn parse_cell(text: &str) -> Result<Self, ParseValueError>;

    /// Whether the scalar is meaningful.
    fn is_unavailable(&self) -> bool;

    /// Lift into the [`Value`] sum type.
    fn into_value(self) -> Value;

    /// Borrow out of a [`Value`] of the same type.
    fn from_value(value: &Value) -> Option<&Self>;
}

macro_rules! scalar_cell {
    ($wrapper:ident, $scalar:ty, $variant:ident, $parse:expr) => {
        impl $wrapper {
            /// An available value.
            #[must_use]
            pub fn new(value: $scalar) -> Self {
                Self {
                    value,
                    unavailable: false,
                }
            }

            /// The value if available.
            #[must_use]
            pub fn get(&self) -> Option<$scalar> {
                (!self.unavailable).then_some(self.value)
            }

            /// Replace the value by parsing `text`. On failure the value is
            /// marked unavailable and the parse error is returned.
            ///
            /// # Errors
            /// Returns the [`ParseValueError`] when `text` does not parse.
            pub fn set_text(&mut self, text: &str) -> Result<(), ParseValueError> {
                match $parse(text) {
                    Ok(v) => {
                        *self = Self::new(v);
                        Ok(())
                    }
                    Err(e) => {
                        *self = <Self as CellValue>::unavailable();
                        Err(e)
                    }
                }
            }
        }

        impl CellValue for $wrapper {
            const COLUMN_TYPE: ColumnType = ColumnType::$variant;

            fn unavailable() -> Self {
                Self {
                    unavailable: true,
                    ..Self::default()
                }
            }

            fn parse_cell(text: &str) -> Result<Self, ParseValueError> {
                $parse(text).map(Self::new)
            }

            fn is_unavailable(&self) -> bool {
                self.unavailable
            }

            fn into_value(self) -> Value {
                Value::$variant(self)
            }

            fn from_value(value: &Value) -> Option<&Self> {
                match value {
                    Value::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }
    };
}

scalar_cell!(BoolVal, bool, Bool, parse_bool);
scalar_cell!(IntVal, i64, Int, parse_int);
scalar_cell!(FloatVal, f64, Float, parse_float);

impl TextVal {
    /// An available value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            unavailable: false,
        }
    }

    /// The value if available.
    #[must_use]
    pub fn get(&self) -> Option<&str> {
        (!self.unavailable).then_some(self.value.as_str())
    }
}

impl CellValue for TextVal {
    const COLUMN_TYPE: ColumnType = ColumnType::Text;

    fn unavailable() -> Self {
        Self {
            value: String::new(),
            unavailable: true,
        }
    }

    fn parse_cell(text: &str) -> Result<Self, ParseValueError> {
        Ok(Self::new(text))
    }

    fn is_unavailable(&self) -> bool {
        self.unavailable
    }

    fn into_value(self) -> Value {
        Value::Text(self)
    }

    fn from_value(value: &Value) -> Option<&Self> {
        match value {
            Value::Text(v) => Some(v),
            _ => None,
        }
    }
}

/// One cell of any column type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Bool(BoolVal),
    Int(IntVal),
    Float(FloatVal),
    Text(TextVal),
}

impl Value {
    /// The unavailable value for a concrete column type.
    ///
    /// Returns `None` for [`ColumnType::Unknown`].
    #[must_use]
    pub fn unavailable(column_type: ColumnType) -> Option<Self> {
        match column_type {
            ColumnType::Bool => Some(Self::Bool(BoolVal::unavailable())),
            ColumnType::Int => Some(Self::Int(IntVal::unavailable())),
            ColumnType::Float => Some(Self::Float(FloatVal::unavailable())),
            ColumnType::Text => Some(Self::Text(TextVal::unavailable())),
            ColumnType::Unknown => None,
        }
    }

    #[must_use]
    pub fn column_type(&self) -> ColumnType {
        match self {
            Self::Bool(_) => ColumnType::Bool,
            Self::Int(_) => ColumnType::Int,
            Self::Float(_) => ColumnType::Float,
            Self::Text(_) => ColumnType::Text,
        }
    }

    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        match self {
            Self::Bool(v) => v.unavailable,
            Self::Int(v) => v.unavailable,
            Self::Float(v) => v.unavailable,
            Self::Text(v) => v.unavailable,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unavailable() {
            return f.write_str("NA");
        }
        match self {
            Self::Bool(v) => write!(f, "{}", v.value),
            Self::Int(v) => write!(f, "{}", v.value),
            Self::Float(v) => write!(f, "{}", v.value),
            Self::Text(v) => f.write_str(&v.value),
        }
    }
}
