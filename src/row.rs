//! Single rows: a registry plus one value per column.
//!
//! Rows are used both ways round. [`Table::row_at`](crate::Table::row_at)
//! materializes a snapshot of one table row, and a row built by hand with
//! [`Row::push`] (or the typed `add_*` helpers) can be appended to any table
//! whose registry matches it.

use crate::column::{Column, ColumnInfo};
use crate::error::{FrameError, Result};
use crate::registry::ColumnRegistry;
use crate::storage::{Lane, RowCells, with_cell_type};
use crate::table::Table;
use crate::value::{BoolVal, CellValue, FloatVal, IntVal, TextVal, Value};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    registry: ColumnRegistry,
    cells: RowCells,
}

impl Row {
    /// A row with the given columns, every value unavailable.
    ///
    /// # Errors
    /// Fails if any descriptor is invalid or a name repeats.
    pub fn new(columns: impl IntoIterator<Item = ColumnInfo>) -> Result<Self> {
        let registry = ColumnRegistry::from_columns(columns)?;
        let mut cells = RowCells::default();
        for ci in registry.columns() {
            with_cell_type!(
                ci.column_type(),
                |T| T::row_lane_mut(&mut cells).push(T::unavailable()),
                unknown => return Err(FrameError::TypesNotSet)
            );
        }
        Ok(Self { registry, cells })
    }

    pub(crate) fn from_parts(registry: ColumnRegistry, cells: RowCells) -> Self {
        Self { registry, cells }
    }

    pub(crate) fn cells(&self) -> &RowCells {
        &self.cells
    }

    /// Append a column holding `value`.
    ///
    /// # Errors
    /// Fails if `name` is blank or already used in this row; the row is left
    /// unchanged.
    pub fn push<T: CellValue>(&mut self, name: impl Into<String>, value: T) -> Result<()> {
        self.registry.add(ColumnInfo::new(name, T::COLUMN_TYPE)?)?;
        <T as Lane>::row_lane_mut(&mut self.cells).push(value);
        Ok(())
    }

    /// Append a bool column. See [`push`](Self::push).
    pub fn add_bool(&mut self, name: impl Into<String>, value: BoolVal) -> Result<()> {
        self.push(name, value)
    }

    /// Append an int column. See [`push`](Self::push).
    pub fn add_int(&mut self, name: impl Into<String>, value: IntVal) -> Result<()> {
        self.push(name, value)
    }

    /// Append a float column. See [`push`](Self::push).
    pub fn add_float(&mut self, name: impl Into<String>, value: FloatVal) -> Result<()> {
        self.push(name, value)
    }

    /// Append a text column. See [`push`](Self::push).
    pub fn add_text(&mut self, name: impl Into<String>, value: TextVal) -> Result<()> {
        self.push(name, value)
    }

    #[must_use]
    pub fn registry(&self) -> &ColumnRegistry {
        &self.registry
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.registry.len()
    }

    #[must_use]
    pub fn columns(&self) -> &[ColumnInfo] {
        self.registry.columns()
    }

    /// The value of column `index`.
    ///
    /// # Errors
    /// [`FrameError::IndexOutOfRange`] for a bad index.
    pub fn value_at(&self, index: usize) -> Result<Value> {
        let index = self.registry.require_index(index)?;
        let slot = self
            .registry
            .slot_of(index)
            .ok_or(FrameError::TypesNotSet)?;
        with_cell_type!(
            self.registry.columns()[index].column_type(),
            |T| T::row_lane(&self.cells)
                .get(slot)
                .cloned()
                .map(CellValue::into_value)
                .ok_or(FrameError::TypesNotSet),
            unknown => Err(FrameError::TypesNotSet)
        )
    }

    /// The value of the named column.
    ///
    /// # Errors
    /// [`FrameError::UnknownColumn`] for a name not in the row.
    pub fn value_by_name(&self, name: &str) -> Result<Value> {
        self.value_at(self.registry.require_name(name)?)
    }

    /// Typed access to the value of column `index`.
    ///
    /// # Errors
    /// [`FrameError::IndexOutOfRange`] or [`FrameError::WrongColumnType`].
    pub fn get_at<T: CellValue>(&self, index: usize) -> Result<&T> {
        let index = self.registry.require_index(index)?;
        let slot = self
            .registry
            .require_type(index, T::COLUMN_TYPE, || format!("with index {index}"))?;
        <T as Lane>::row_lane(&self.cells)
            .get(slot)
            .ok_or(FrameError::TypesNotSet)
    }

    /// Typed access to the value of the named column.
    ///
    /// # Errors
    /// [`FrameError::UnknownColumn`] or [`FrameError::WrongColumnType`].
    pub fn get<T: CellValue>(&self, name: &str) -> Result<&T> {
        let index = self.registry.require_name(name)?;
        self.get_at(index).map_err(|e| rename_column(e, name))
    }

    /// Overwrite the value of the named column.
    ///
    /// # Errors
    /// [`FrameError::UnknownColumn`] or [`FrameError::WrongColumnType`].
    pub fn set<T: CellValue>(&mut self, name: &str, value: T) -> Result<()> {
        let index = self.registry.require_name(name)?;
        let slot = self
            .registry
            .require_type(index, T::COLUMN_TYPE, || format!("named {name:?}"))?;
        let cell = <T as Lane>::row_lane_mut(&mut self.cells)
            .get_mut(slot)
            .ok_or(FrameError::TypesNotSet)?;
        *cell = value;
        Ok(())
    }

    /// An empty table with the same columns, in the same order, as this row.
    #[must_use]
    pub fn to_empty_table(&self) -> Table {
        Table::with_registry(self.registry.clone())
    }

    /// One single-value column per requested index, in request order.
    ///
    /// # Errors
    /// [`FrameError::IndexOutOfRange`] for the first bad index.
    pub fn columns_by_index(&self, indexes: &[usize]) -> Result<Vec<Column>> {
        indexes.iter().map(|&i| self.column_at(i)).collect()
    }

    /// One single-value column per requested name, in request order.
    ///
    /// # Errors
    /// [`FrameError::UnknownColumn`] for the first unknown name.
    pub fn columns_by_name<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<Column>> {
        names
            .iter()
            .map(|name| self.column_at(self.registry.require_name(name.as_ref())?))
            .collect()
    }

    fn column_at(&self, index: usize) -> Result<Column> {
        let index = self.registry.require_index(index)?;
        let ci = self.registry.columns()[index].clone();
        let slot = self
            .registry
            .slot_of(index)
            .ok_or(FrameError::TypesNotSet)?;
        with_cell_type!(
            ci.column_type(),
            |T| {
                let value = T::row_lane(&self.cells)
                    .get(slot)
                    .cloned()
                    .ok_or(FrameError::TypesNotSet)?;
                Ok(Column::from_values(ci, vec![value]))
            },
            unknown => Err(FrameError::TypesNotSet)
        )
    }
}

/// Re-describe a by-index type error in terms of the column name.
fn rename_column(err: FrameError, name: &str) -> FrameError {
    match err {
        FrameError::WrongColumnType { actual, wanted, .. } => FrameError::WrongColumnType {
            column: format!("named {name:?}"),
            actual,
            wanted,
        },
        other => other,
    }
}
