//! Helpers for testing code that reads tables.
//!
//! ```
//! use ironframe::ColumnType;
//! use ironframe::testing::{assert_layout, assert_row_count_consistent, read_fixture, MIXED_TYPES};
//!
//! # fn main() -> anyhow::Result<()> {
//! let table = read_fixture(MIXED_TYPES, [])?;
//! assert_layout(
//!     &table,
//!     &[
//!         ("V0", ColumnType::Bool),
//!         ("V1", ColumnType::Int),
//!         ("V2", ColumnType::Float),
//!         ("V3", ColumnType::Text),
//!     ],
//! );
//! assert_row_count_consistent(&table);
//! # Ok(())
//! # }
//! ```

use crate::reader::{ReaderOption, TableReader};
use crate::table::Table;
use crate::types::ColumnType;

/// Six rows whose columns infer as bool, int, float and text.
pub const MIXED_TYPES: &str = "\
true 2 3.1 4
false -1 3.1e33 4hello
False 9999999 3 4
FALSE 0 3 4
f 2 3 4
1 2 3 4";

/// Four integer columns with a header line.
pub const WITH_HEADER: &str = "\
firstCol 2ndCol 3rd lastCol
9 2 3 4
9 2 3 4";

/// Assert that the table's columns have exactly these names and types, in
/// order.
///
/// # Panics
///
/// Panics with both layouts when they differ.
pub fn assert_layout(table: &Table, expected: &[(&str, ColumnType)]) {
    let actual: Vec<(&str, ColumnType)> = table
        .columns()
        .iter()
        .map(|ci| (ci.name(), ci.column_type()))
        .collect();
    assert_eq!(
        actual, expected,
        "Table layout mismatch:\n  Expected: {expected:?}\n  Actual: {actual:?}"
    );
}

/// Assert that every column holds exactly [`Table::row_count`] values.
///
/// # Panics
///
/// Panics naming the first column whose length differs, or if a column
/// cannot be read back.
pub fn assert_row_count_consistent(table: &Table) {
    let rows = table.row_count();
    for index in 0..table.column_count() {
        let column = table
            .column_by_index(index)
            .unwrap_or_else(|e| panic!("column {index} cannot be read: {e}"));
        assert_eq!(
            column.row_count(),
            rows,
            "Column {index} ({:?}) has {} values but the table has {rows} rows",
            column.name(),
            column.row_count()
        );
    }
}

/// Read `text` with a reader built from `options`, labelled `"fixture"`.
///
/// # Errors
/// Any configuration or read error.
pub fn read_fixture(
    text: &str,
    options: impl IntoIterator<Item = ReaderOption>,
) -> anyhow::Result<Table> {
    let reader = TableReader::new(options)?;
    reader.read_str(text, "fixture")
}
