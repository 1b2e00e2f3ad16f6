//! The columnar store.
//!
//! A [`Table`] keeps one array of columns per concrete type. The
//! [`ColumnRegistry`] records each column's name, type and slot, and is the
//! only thing that binds the logical column order to the physical storage.
//!
//! Every column holds the same number of values once a row append has
//! finished: a row with the wrong number of fields is rejected whole, and a
//! cell that fails to parse is stored as unavailable rather than dropped.
//!
//! # Example
//!
//! ```
//! use ironframe::{ColumnType, Table};
//!
//! # fn main() -> ironframe::Result<()> {
//! let mut table = Table::new();
//! table.set_column_names(&["id", "score"])?;
//! table.set_column_types(&[ColumnType::Int, ColumnType::Float])?;
//!
//! assert_eq!(table.add_row_from_text(&["1", "0.5"]), 0);
//! assert_eq!(table.add_row_from_text(&["2", "oops"]), 1);
//!
//! assert_eq!(table.row_count(), 2);
//! assert_eq!(table.error_count(), 1);
//! let scores = table.float_values_by_name("score")?;
//! assert!(scores[1].unavailable);
//! # Ok(())
//! # }
//! ```

use crate::column::{Column, ColumnInfo};
use crate::diagnostics::ErrorLog;
use crate::error::{FrameError, Result};
use crate::registry::ColumnRegistry;
use crate::row::Row;
use crate::storage::{ColumnStore, Lane, RowCells, with_cell_type};
use crate::types::ColumnType;
use crate::value::{BoolVal, CellValue, FloatVal, IntVal, TextVal};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    registry: ColumnRegistry,
    store: ColumnStore,
    errors: ErrorLog,
}

impl Table {
    /// An empty table with no columns.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty table whose error log keeps at most `max_errors` errors.
    #[must_use]
    pub fn with_max_errors(max_errors: usize) -> Self {
        Self {
            errors: ErrorLog::with_max_errors(max_errors),
            ..Self::default()
        }
    }

    /// An empty table laid out according to a complete registry.
    pub(crate) fn with_registry(registry: ColumnRegistry) -> Self {
        let mut store = ColumnStore::default();
        for ci in registry.columns() {
            with_cell_type!(
                ci.column_type(),
                |T| T::store_lane_mut(&mut store).push(Vec::new()),
                unknown => debug_assert!(false, "registered column without a type")
            );
        }
        Self {
            registry,
            store,
            errors: ErrorLog::default(),
        }
    }

    /// A table with the same columns and error cap but no rows and no
    /// recorded errors.
    #[must_use]
    pub fn empty_like(&self) -> Self {
        Self {
            registry: self.registry.clone(),
            store: self.store.empty_like(),
            errors: ErrorLog::with_max_errors(self.errors.max_errors()),
        }
    }

    fn fail<T>(&mut self, err: FrameError) -> Result<T> {
        self.errors.record(err.clone());
        Err(err)
    }

    pub(crate) fn record_error(&mut self, err: FrameError) {
        self.errors.record(err);
    }

    /// Name the columns.
    ///
    /// On a table without columns this creates `names.len()` columns whose
    /// types are still to be set. Otherwise the number of names must match
    /// the number of columns.
    ///
    /// # Errors
    /// [`FrameError::NoNamesGiven`], [`FrameError::ColumnCountMismatch`] or
    /// [`FrameError::DuplicateName`]; the error is also recorded in the
    /// table's error log and the table is left unchanged.
    pub fn set_column_names<S: AsRef<str>>(&mut self, names: &[S]) -> Result<()> {
        if names.is_empty() {
            return self.fail(FrameError::NoNamesGiven);
        }
        if !self.registry.is_empty() && self.registry.len() != names.len() {
            return self.fail(FrameError::ColumnCountMismatch {
                what: "names",
                columns: self.registry.len(),
                given: names.len(),
            });
        }

        let mut seen: HashMap<&str, usize> = HashMap::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            if let Some(&first) = seen.get(name.as_ref()) {
                return self.fail(FrameError::DuplicateName {
                    name: name.as_ref().to_string(),
                    first,
                    second: i,
                });
            }
            seen.insert(name.as_ref(), i);
        }

        if self.registry.is_empty() {
            self.registry.reserve_pending(names.len());
        }
        let owned: Vec<String> = names.iter().map(|n| n.as_ref().to_string()).collect();
        self.registry.rename_all(&owned);
        Ok(())
    }

    /// Type the columns and allocate their storage.
    ///
    /// Arity follows the same rules as [`set_column_names`](Self::set_column_names).
    ///
    /// # Errors
    /// [`FrameError::NoTypesGiven`], [`FrameError::InvalidColumnType`] naming
    /// the first non-concrete type, [`FrameError::TypesAlreadySet`] or
    /// [`FrameError::ColumnCountMismatch`]; the error is also recorded.
    pub fn set_column_types(&mut self, types: &[ColumnType]) -> Result<()> {
        if types.is_empty() {
            return self.fail(FrameError::NoTypesGiven);
        }
        if let Some((index, &column_type)) =
            types.iter().enumerate().find(|(_, t)| !t.is_concrete())
        {
            return self.fail(FrameError::InvalidColumnType { index, column_type });
        }
        if self.registry.is_typed() {
            return self.fail(FrameError::TypesAlreadySet);
        }
        if self.registry.is_empty() {
            self.registry.reserve_pending(types.len());
        } else if self.registry.len() != types.len() {
            return self.fail(FrameError::ColumnCountMismatch {
                what: "types",
                columns: self.registry.len(),
                given: types.len(),
            });
        }

        for (i, &column_type) in types.iter().enumerate() {
            let slot = with_cell_type!(
                column_type,
                |T| {
                    let lane = T::store_lane_mut(&mut self.store);
                    lane.push(Vec::new());
                    lane.len() - 1
                },
                unknown => unreachable!("types were checked above")
            );
            self.registry.assign_type(i, column_type, slot);
        }
        Ok(())
    }

    /// Number of rows; 0 for a table without typed columns.
    #[must_use]
    pub fn row_count(&self) -> usize {
        let (Some(ci), Some(slot)) = (self.registry.info(0), self.registry.slot_of(0)) else {
            return 0;
        };
        with_cell_type!(
            ci.column_type(),
            |T| T::store_lane(&self.store).get(slot).map_or(0, Vec::len),
            unknown => 0
        )
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.registry.len()
    }

    /// The column descriptors, in column order.
    #[must_use]
    pub fn columns(&self) -> &[ColumnInfo] {
        self.registry.columns()
    }

    #[must_use]
    pub fn registry(&self) -> &ColumnRegistry {
        &self.registry
    }

    /// # Errors
    /// [`FrameError::UnknownColumn`].
    pub fn column_info_by_name(&self, name: &str) -> Result<&ColumnInfo> {
        let index = self.registry.require_name(name)?;
        Ok(&self.registry.columns()[index])
    }

    /// # Errors
    /// [`FrameError::IndexOutOfRange`].
    pub fn column_info_by_index(&self, index: usize) -> Result<&ColumnInfo> {
        let index = self.registry.require_index(index)?;
        Ok(&self.registry.columns()[index])
    }

    /// Append a row parsed from text fields, one per column.
    ///
    /// A row with the wrong number of fields is not appended at all. A field
    /// that does not parse as its column's type is stored as unavailable so
    /// that every column keeps the same length. Each problem is recorded in
    /// the error log; the return value is the number recorded for this row.
    pub fn add_row_from_text<S: AsRef<str>>(&mut self, fields: &[S]) -> usize {
        if fields.len() != self.registry.len() {
            self.record_error(FrameError::RowArity {
                columns: self.registry.len(),
                given: fields.len(),
            });
            return 1;
        }
        if !self.registry.is_typed() {
            self.record_error(FrameError::TypesNotSet);
            return 1;
        }

        let row = self.row_count();
        let mut failures = 0;
        for (column, field) in fields.iter().enumerate() {
            let column_type = self.registry.columns()[column].column_type();
            let Some(slot) = self.registry.slot_of(column) else {
                continue;
            };
            let parsed = with_cell_type!(
                column_type,
                |T| {
                    let lane = &mut T::store_lane_mut(&mut self.store)[slot];
                    match T::parse_cell(field.as_ref()) {
                        Ok(v) => {
                            lane.push(v);
                            Ok(())
                        }
                        Err(e) => {
                            lane.push(T::unavailable());
                            Err(e)
                        }
                    }
                },
                unknown => Ok(())
            );
            if let Err(e) = parsed {
                failures += 1;
                self.record_error(FrameError::CellParse {
                    row,
                    column,
                    detail: e.to_string(),
                });
            }
        }
        failures
    }

    /// Append each row of text fields in turn; returns the total number of
    /// errors recorded.
    pub fn add_rows_from_text<S: AsRef<str>>(&mut self, rows: &[Vec<S>]) -> usize {
        rows.iter().map(|row| self.add_row_from_text(row)).sum()
    }

    /// Append a row built elsewhere.
    ///
    /// # Errors
    /// [`FrameError::LayoutMismatch`] naming the first difference when the
    /// row's registry does not match the table's.
    pub fn add_row(&mut self, row: &Row) -> Result<()> {
        if let Some(diff) = self.registry.first_difference(row.registry()) {
            return self.fail(FrameError::LayoutMismatch(diff));
        }
        for (i, ci) in self.registry.columns().iter().enumerate() {
            let Some(slot) = self.registry.slot_of(i) else {
                continue;
            };
            with_cell_type!(
                ci.column_type(),
                |T| {
                    let value = T::row_lane(row.cells())[slot].clone();
                    T::store_lane_mut(&mut self.store)[slot].push(value);
                },
                unknown => {}
            );
        }
        Ok(())
    }

    /// A snapshot of row `index`.
    ///
    /// Out-of-range indexes (including negative ones) give an all-unavailable
    /// row rather than an error.
    #[must_use]
    pub fn row_at(&self, index: isize) -> Row {
        let Ok(i) = usize::try_from(index) else {
            return self.row_unavailable();
        };
        if i >= self.row_count() {
            return self.row_unavailable();
        }

        let mut cells = RowCells::default();
        for (c, ci) in self.registry.columns().iter().enumerate() {
            let Some(slot) = self.registry.slot_of(c) else {
                continue;
            };
            with_cell_type!(
                ci.column_type(),
                |T| {
                    let value = T::store_lane(&self.store)[slot][i].clone();
                    T::row_lane_mut(&mut cells).push(value);
                },
                unknown => {}
            );
        }
        Row::from_parts(self.registry.clone(), cells)
    }

    /// A row shaped like this table with every value at its zero value.
    #[must_use]
    pub fn row_zero(&self) -> Row {
        self.blank_row(false)
    }

    /// A row shaped like this table with every value unavailable.
    #[must_use]
    pub fn row_unavailable(&self) -> Row {
        self.blank_row(true)
    }

    fn blank_row(&self, unavailable: bool) -> Row {
        let mut cells = RowCells::default();
        for ci in self.registry.columns() {
            with_cell_type!(
                ci.column_type(),
                |T| T::row_lane_mut(&mut cells).push(if unavailable {
                    T::unavailable()
                } else {
                    T::default()
                }),
                unknown => {}
            );
        }
        Row::from_parts(self.registry.clone(), cells)
    }

    /// A copy of column `index`.
    ///
    /// # Errors
    /// [`FrameError::IndexOutOfRange`], or [`FrameError::TypesNotSet`] while
    /// the table is still untyped.
    pub fn column_by_index(&self, index: usize) -> Result<Column> {
        let index = self.registry.require_index(index)?;
        let ci = self.registry.columns()[index].clone();
        let slot = self
            .registry
            .slot_of(index)
            .ok_or(FrameError::TypesNotSet)?;
        with_cell_type!(
            ci.column_type(),
            |T| Ok(Column::from_values(ci, T::store_lane(&self.store)[slot].clone())),
            unknown => Err(FrameError::TypesNotSet)
        )
    }

    /// A copy of the named column.
    ///
    /// # Errors
    /// [`FrameError::UnknownColumn`].
    pub fn column_by_name(&self, name: &str) -> Result<Column> {
        self.column_by_index(self.registry.require_name(name)?)
    }

    /// The values of column `index`, which must hold `T`.
    ///
    /// # Errors
    /// [`FrameError::IndexOutOfRange`] or [`FrameError::WrongColumnType`].
    pub fn values_at<T: CellValue>(&self, index: usize) -> Result<&[T]> {
        let index = self.registry.require_index(index)?;
        let slot = self
            .registry
            .require_type(index, T::COLUMN_TYPE, || format!("with index {index}"))?;
        Ok(&<T as Lane>::store_lane(&self.store)[slot])
    }

    /// The values of the named column, which must hold `T`.
    ///
    /// # Errors
    /// [`FrameError::UnknownColumn`] or [`FrameError::WrongColumnType`].
    pub fn values_by_name<T: CellValue>(&self, name: &str) -> Result<&[T]> {
        let index = self.registry.require_name(name)?;
        let slot = self
            .registry
            .require_type(index, T::COLUMN_TYPE, || format!("named {name:?}"))?;
        Ok(&<T as Lane>::store_lane(&self.store)[slot])
    }

    /// Total number of errors recorded while building the table.
    #[must_use]
    pub fn error_count(&self) -> u64 {
        self.errors.count()
    }

    /// The first errors recorded, up to the log's cap.
    #[must_use]
    pub fn errors(&self) -> &[FrameError] {
        self.errors.errors()
    }

    #[must_use]
    pub fn error_log(&self) -> &ErrorLog {
        &self.errors
    }
}

macro_rules! typed_accessors {
    ($($prefix:ident => $wrapper:ty),* $(,)?) => {
        paste::paste! {
            impl Table {
                $(
                    #[doc = "The `" $prefix "` values of the named column. See [`values_by_name`](Self::values_by_name)."]
                    ///
                    /// # Errors
                    /// See [`values_by_name`](Self::values_by_name).
                    pub fn [<$prefix _values_by_name>](&self, name: &str) -> Result<&[$wrapper]> {
                        self.values_by_name::<$wrapper>(name)
                    }

                    #[doc = "The `" $prefix "` values of column `index`. See [`values_at`](Self::values_at)."]
                    ///
                    /// # Errors
                    /// See [`values_at`](Self::values_at).
                    pub fn [<$prefix _values_at>](&self, index: usize) -> Result<&[$wrapper]> {
                        self.values_at::<$wrapper>(index)
                    }
                )*
            }
        }
    };
}

typed_accessors!(bool => BoolVal, int => IntVal, float => FloatVal, text => TextVal);

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} rows, {} columns", self.row_count(), self.column_count())
    }
}
