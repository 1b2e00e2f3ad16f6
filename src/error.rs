//! Error types shared by the table, registry, row and reader modules.
//!
//! Every failure the crate can report is a [`FrameError`]. Configuration
//! errors are returned when a reader option is applied; structural errors are
//! returned by the table/row/registry accessors; ingestion errors are recorded
//! into a table's [`ErrorLog`](crate::diagnostics::ErrorLog) while lines are
//! being read and, unless the reader is permissive, returned to the caller.

use crate::types::ColumnType;
use thiserror::Error;

/// Result type for table operations.
pub type Result<T> = std::result::Result<T, FrameError>;

/// All errors produced by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    // ---- reader configuration ----
    #[error("you cannot give column names and take names from a header")]
    HasNamesAndHeader,

    #[error("no column names have been given")]
    NoNamesGiven,

    #[error("the column names have already been set")]
    NamesAlreadySet,

    #[error("no column types have been given")]
    NoTypesGiven,

    #[error("the column types have already been set")]
    TypesAlreadySet,

    #[error("either give column types explicitly or give some lines to work it out")]
    NoTypeInfo,

    #[error("the number of column types ({types}) and names ({names}) differ")]
    NameTypeCountMismatch { types: usize, names: usize },

    #[error("no column skip indexes have been given")]
    NoSkipColumnsGiven,

    #[error("the column skip indexes have already been set")]
    SkipColumnsAlreadySet,

    #[error("a duplicate skip index has been given: skips[{position}] == {index}")]
    DuplicateSkipColumn { position: usize, index: usize },

    #[error("the {purpose} is invalid: {detail}")]
    InvalidPattern { purpose: &'static str, detail: String },

    // ---- structure ----
    #[error("the number of columns ({columns}) and number of {what} ({given}) differ")]
    ColumnCountMismatch {
        what: &'static str,
        columns: usize,
        given: usize,
    },

    #[error("duplicate column name: {name:?} is used for columns {first} and {second}")]
    DuplicateName {
        name: String,
        first: usize,
        second: usize,
    },

    #[error("bad column type: column: {index} type: {column_type}")]
    InvalidColumnType { index: usize, column_type: ColumnType },

    #[error("the column type code {0} is out of range")]
    ColumnTypeCode(u8),

    #[error("the column name is invalid: it must not be blank")]
    BlankColumnName,

    #[error("{0} is not a column type")]
    NotAColumnType(ColumnType),

    #[error("column {index} ({name:?}): {reason}")]
    ColumnRejected {
        index: usize,
        name: String,
        reason: Box<FrameError>,
    },

    #[error("the row does not match the table: {0}")]
    LayoutMismatch(String),

    #[error("unknown column name: {0:?}")]
    UnknownColumn(String),

    #[error("there is no column {index} (column count: {count})")]
    IndexOutOfRange { index: usize, count: usize },

    #[error("the column {column} is of type {actual} not {wanted}")]
    WrongColumnType {
        column: String,
        actual: ColumnType,
        wanted: ColumnType,
    },

    #[error("the column types have not been set")]
    TypesNotSet,

    #[error("there is no row {index} (row count: {count})")]
    RowOutOfRange { index: usize, count: usize },

    // ---- ingestion ----
    #[error("the table has {columns} columns, {given} are being added")]
    RowArity { columns: usize, given: usize },

    #[error("data row: {row} column: {column}: {detail}")]
    CellParse {
        row: usize,
        column: usize,
        detail: String,
    },

    #[error("{location}: unexpected blank line")]
    UnexpectedBlankLine { location: String },

    #[error("{location}: some skip columns are after the end of the line: {indexes}")]
    SkipColumnsPastEnd { location: String, indexes: String },

    #[error("{location}: the table has {columns} columns but this line has {given}: {fields}")]
    LineArity {
        location: String,
        columns: usize,
        given: usize,
        fields: String,
    },

    #[error("{location}: parsing errors")]
    ParseErrors { location: String },

    #[error("{source_label}: {count} errors parsing initial lines (first error: {first})")]
    InitialLinesErrors {
        source_label: String,
        count: u64,
        first: String,
    },
}

impl FrameError {
    /// Whether this error was produced while consuming input lines, as
    /// opposed to configuring a reader or calling an accessor.
    #[must_use]
    pub fn is_ingestion(&self) -> bool {
        matches!(
            self,
            Self::RowArity { .. }
                | Self::CellParse { .. }
                | Self::UnexpectedBlankLine { .. }
                | Self::SkipColumnsPastEnd { .. }
                | Self::LineArity { .. }
                | Self::ParseErrors { .. }
                | Self::InitialLinesErrors { .. }
        )
    }
}
