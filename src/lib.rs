//! # Ironframe
//!
//! Typed, column-oriented tables read from whitespace or regex delimited text.
//!
//! Ironframe reads plain text tables (one row per line, fields split by a
//! pattern) into a [`Table`] whose columns are each stored as a dense array of
//! one of four types: bool, int, float or text. Column types can be given
//! explicitly or inferred from the first rows of the input.
//!
//! ## Key Features
//!
//! - **Streaming reads** - a single pass over the input, one line at a time
//! - **Type inference** - from a configurable sample of leading rows
//! - **Configurable line handling** - comment stripping, skipped lines and
//!   columns, headers, custom split patterns
//! - **Strict or permissive** - fail on the first bad line, or record errors
//!   in a capped log and keep going
//! - **Row and column views** - snapshot any row, project any column
//! - **Compressed files** - gzip, zstd, bzip2 and xz are read transparently
//!
//! ## Quick Start
//!
//! ```
//! use ironframe::{ColumnType, ReaderBuilder};
//!
//! # fn main() -> anyhow::Result<()> {
//! let reader = ReaderBuilder::new().has_header().build()?;
//! let table = reader.read_str("id score ok\n1 0.5 true\n2 1.5 false\n", "inline")?;
//!
//! assert_eq!(table.row_count(), 2);
//! assert_eq!(table.column_info_by_name("score")?.column_type(), ColumnType::Float);
//!
//! let scores = table.float_values_by_name("score")?;
//! assert_eq!(scores[1].get(), Some(1.5));
//!
//! let row = table.row_at(0);
//! assert_eq!(row.get::<ironframe::IntVal>("id")?.get(), Some(1));
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Concepts
//!
//! ### Table
//!
//! A [`Table`] keeps one array of columns per type. Its [`ColumnRegistry`]
//! maps each column name to its position, and each position to the column's
//! slot within the array for its type.
//!
//! ### Values
//!
//! Every cell is a wrapper such as [`IntVal`]: the scalar plus an
//! `unavailable` flag. A field that fails to parse is stored as unavailable
//! and the failure is recorded in the table's [`ErrorLog`], so every column
//! always has the same number of values.
//!
//! ### Rows and columns
//!
//! [`Table::row_at`] returns a [`Row`] holding its own copy of the registry
//! and values. Rows can also be built by hand and appended with
//! [`Table::add_row`] when their layout matches. [`Table::column_by_name`]
//! returns a [`Column`] copy of a single column.
//!
//! ### Reading
//!
//! A [`TableReader`] runs every line through a fixed chain of stages. See the
//! [`reader`] module for the details and the available [`ReaderOption`]s.

pub mod column;
pub mod diagnostics;
pub mod error;
pub mod io;
pub mod reader;
pub mod registry;
pub mod row;
mod storage;
pub mod table;
pub mod testing;
pub mod types;
pub mod value;

pub use column::{Column, ColumnData, ColumnInfo};
pub use diagnostics::{ErrorLog, ErrorReport};
pub use error::{FrameError, Result};
pub use reader::config::ReaderConfig;
pub use reader::stats::ReadStats;
pub use reader::{ReaderBuilder, ReaderOption, TableReader};
pub use registry::ColumnRegistry;
pub use row::Row;
pub use table::Table;
pub use types::ColumnType;
pub use value::{BoolVal, CellValue, FloatVal, IntVal, ParseValueError, TextVal, Value};
