//! Column descriptors and single-column views.

use crate::error::{FrameError, Result};
use crate::storage::Lane;
use crate::types::ColumnType;
use crate::value::{BoolVal, CellValue, FloatVal, IntVal, TextVal, Value};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name and type of one column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnInfo {
    name: String,
    column_type: ColumnType,
}

impl ColumnInfo {
    /// Build a descriptor with a concrete type.
    ///
    /// # Errors
    /// Returns [`FrameError::NotAColumnType`] for [`ColumnType::Unknown`].
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Result<Self> {
        if !column_type.is_concrete() {
            return Err(FrameError::NotAColumnType(column_type));
        }
        Ok(Self {
            name: name.into(),
            column_type,
        })
    }

    /// Descriptor used while a table's names or types are still being set.
    pub(crate) fn pending(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }

    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub(crate) fn set_column_type(&mut self, column_type: ColumnType) {
        self.column_type = column_type;
    }

    /// Check that the descriptor can be registered: the name must not be
    /// blank and the type must be concrete.
    ///
    /// # Errors
    /// [`FrameError::BlankColumnName`] or [`FrameError::NotAColumnType`].
    pub fn check(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(FrameError::BlankColumnName);
        }
        if !self.column_type.is_concrete() {
            return Err(FrameError::NotAColumnType(self.column_type));
        }
        Ok(())
    }

    /// True if the name or type differ.
    #[must_use]
    pub fn differs(&self, other: &ColumnInfo) -> bool {
        self != other
    }
}

impl fmt::Display for ColumnInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.column_type)
    }
}

/// The values of one column, stored densely by type.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Bool(Vec<BoolVal>),
    Int(Vec<IntVal>),
    Float(Vec<FloatVal>),
    Text(Vec<TextVal>),
}

impl ColumnData {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Bool(v) => v.len(),
            Self::Int(v) => v.len(),
            Self::Float(v) => v.len(),
            Self::Text(v) => v.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn value(&self, i: usize) -> Option<Value> {
        match self {
            Self::Bool(v) => v.get(i).map(|c| c.into_value()),
            Self::Int(v) => v.get(i).map(|c| c.into_value()),
            Self::Float(v) => v.get(i).map(|c| c.into_value()),
            Self::Text(v) => v.get(i).cloned().map(CellValue::into_value),
        }
    }
}

/// A single column detached from its table or row: its descriptor plus a
/// copy of its values.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    info: ColumnInfo,
    data: ColumnData,
}

impl Column {
    pub(crate) fn from_values<T: CellValue>(info: ColumnInfo, values: Vec<T>) -> Self {
        debug_assert_eq!(info.column_type(), T::COLUMN_TYPE);
        Self {
            info,
            data: <T as Lane>::wrap_column(values),
        }
    }

    #[must_use]
    pub fn info(&self) -> &ColumnInfo {
        &self.info
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.info.name()
    }

    #[must_use]
    pub fn column_type(&self) -> ColumnType {
        self.info.column_type()
    }

    #[must_use]
    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.data.len()
    }

    /// The value in row `i`.
    ///
    /// # Errors
    /// [`FrameError::RowOutOfRange`] when `i` is past the last row.
    pub fn get(&self, i: usize) -> Result<Value> {
        self.data.value(i).ok_or(FrameError::RowOutOfRange {
            index: i,
            count: self.row_count(),
        })
    }

    /// The typed values of the column.
    ///
    /// # Errors
    /// [`FrameError::WrongColumnType`] when `T` is not the column's type.
    pub fn values<T: CellValue>(&self) -> Result<&[T]> {
        <T as Lane>::column_slice(&self.data).ok_or_else(|| FrameError::WrongColumnType {
            column: format!("named {:?}", self.info.name()),
            actual: self.info.column_type(),
            wanted: T::COLUMN_TYPE,
        })
    }
}
