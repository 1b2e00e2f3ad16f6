//! Reading tables from delimited text.
//!
//! A [`TableReader`] holds the reading options and turns a line source into a
//! [`Table`]. Each line goes through a fixed chain of stages: leading lines
//! are skipped, comments stripped, blank lines handled, the line split into
//! fields (dropping any skip columns), the first data line used to name the
//! columns, the field count checked, and finally the row is either buffered
//! for type inference or added to the table.
//!
//! Column types come either from [`ReaderOption::ColumnTypes`] or from the
//! first [`ReaderOption::SampleLines`] data rows (10 by default). Rows held
//! back for inference are added to the table once the types are known, so
//! nothing is lost.
//!
//! # Errors and permissive mode
//!
//! By default the first problem found in the input aborts the read and is
//! returned as a [`FrameError`] inside the `anyhow::Error`. With
//! [`ReaderOption::Permissive`] the problem is recorded in the table's error
//! log instead, the offending line is dropped, and reading carries on.
//!
//! # Example
//!
//! ```
//! use ironframe::{ColumnType, ReaderBuilder};
//!
//! # fn main() -> anyhow::Result<()> {
//! let reader = ReaderBuilder::new()
//!     .has_header()
//!     .comment_pattern(r"\s*#.*$")
//!     .build()?;
//!
//! let table = reader.read_str("name age # people\nann 31\nbob 27\n", "inline")?;
//! assert_eq!(table.row_count(), 2);
//! assert_eq!(table.column_info_by_name("age")?.column_type(), ColumnType::Int);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod infer;
pub mod location;
mod stages;
pub mod stats;

use crate::diagnostics::DEFAULT_MAX_ERRORS;
use crate::error::{FrameError, Result};
use crate::io::compression::auto_detect_reader;
use crate::io::lines::LossyLines;
use crate::table::Table;
use crate::types::ColumnType;
use anyhow::Context;
use log::{info, trace, warn};
use regex::Regex;
use stages::{Flow, PIPELINE, ReadState, flush_sample};
use stats::ReadStats;
use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::io::{BufRead, Cursor};
use std::path::Path;

const DEFAULT_SPLIT_PATTERN: &str = r"\s+";
const DEFAULT_SAMPLE_LINES: usize = 10;

/// One reading option. Options are applied in order and each may fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReaderOption {
    /// Take the column names from the first line that is not skipped.
    /// Cannot be combined with [`ColumnNames`](Self::ColumnNames).
    HasHeader,
    /// Ignore empty lines instead of treating them as errors.
    SkipBlankLines,
    /// Record input errors on the table and keep reading.
    Permissive,
    ColumnNames(Vec<String>),
    /// Fixes the column types; no rows are sampled for inference.
    ColumnTypes(Vec<ColumnType>),
    /// Lines are cut at the first match of this pattern.
    CommentPattern(String),
    /// Fields are separated by matches of this pattern; default `\s+`.
    SplitPattern(String),
    /// Number of leading lines to ignore unconditionally.
    SkipLines(usize),
    /// Number of data rows used to infer column types.
    SampleLines(usize),
    /// Zero-based field positions dropped from every line.
    SkipColumns(Vec<usize>),
    /// Cap on the errors kept in detail by the table's error log.
    MaxErrors(usize),
}

/// Reads delimited text into tables.
///
/// A reader is immutable once built and can be used for any number of reads.
#[derive(Debug, Clone)]
pub struct TableReader {
    has_header: bool,
    skip_blank_lines: bool,
    permissive: bool,
    comment: Option<Regex>,
    split: Regex,
    names: Vec<String>,
    types: Vec<ColumnType>,
    skip_lines: usize,
    sample_lines: usize,
    skip_columns: BTreeSet<usize>,
    max_errors: usize,
}

impl TableReader {
    /// Build a reader from options applied in order.
    ///
    /// # Errors
    /// The first option that cannot be applied, or
    /// [`FrameError::NoTypeInfo`] when neither column types nor a sample
    /// size are available.
    pub fn new(options: impl IntoIterator<Item = ReaderOption>) -> Result<Self> {
        let mut reader = Self {
            has_header: false,
            skip_blank_lines: false,
            permissive: false,
            comment: None,
            split: compile(DEFAULT_SPLIT_PATTERN, "pattern for splitting lines")?,
            names: Vec::new(),
            types: Vec::new(),
            skip_lines: 0,
            sample_lines: DEFAULT_SAMPLE_LINES,
            skip_columns: BTreeSet::new(),
            max_errors: DEFAULT_MAX_ERRORS,
        };
        for option in options {
            reader.apply(option)?;
        }

        if reader.sample_lines == 0 && reader.types.is_empty() {
            return Err(FrameError::NoTypeInfo);
        }
        if !reader.types.is_empty() {
            reader.sample_lines = 0;
        }
        Ok(reader)
    }

    fn apply(&mut self, option: ReaderOption) -> Result<()> {
        match option {
            ReaderOption::HasHeader => {
                self.has_header = true;
                if !self.names.is_empty() {
                    return Err(FrameError::HasNamesAndHeader);
                }
            }
            ReaderOption::SkipBlankLines => self.skip_blank_lines = true,
            ReaderOption::Permissive => self.permissive = true,
            ReaderOption::ColumnNames(names) => self.set_names(names)?,
            ReaderOption::ColumnTypes(types) => self.set_types(types)?,
            ReaderOption::CommentPattern(pattern) => {
                self.comment = Some(compile(&pattern, "regexp to strip comments")?);
            }
            ReaderOption::SplitPattern(pattern) => {
                self.split = compile(&pattern, "pattern for splitting lines")?;
            }
            ReaderOption::SkipLines(n) => self.skip_lines = n,
            ReaderOption::SampleLines(n) => self.sample_lines = n,
            ReaderOption::SkipColumns(columns) => self.set_skip_columns(&columns)?,
            ReaderOption::MaxErrors(n) => self.max_errors = n,
        }
        Ok(())
    }

    fn set_names(&mut self, names: Vec<String>) -> Result<()> {
        if self.has_header {
            return Err(FrameError::HasNamesAndHeader);
        }
        if names.is_empty() {
            return Err(FrameError::NoNamesGiven);
        }
        if !self.names.is_empty() {
            return Err(FrameError::NamesAlreadySet);
        }
        if !self.types.is_empty() && self.types.len() != names.len() {
            return Err(FrameError::NameTypeCountMismatch {
                types: self.types.len(),
                names: names.len(),
            });
        }
        let mut seen = HashMap::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            if let Some(first) = seen.insert(name.as_str(), i) {
                return Err(FrameError::DuplicateName {
                    name: name.clone(),
                    first,
                    second: i,
                });
            }
        }
        self.names = names;
        Ok(())
    }

    fn set_types(&mut self, types: Vec<ColumnType>) -> Result<()> {
        if types.is_empty() {
            return Err(FrameError::NoTypesGiven);
        }
        if !self.types.is_empty() {
            return Err(FrameError::TypesAlreadySet);
        }
        if !self.names.is_empty() && self.names.len() != types.len() {
            return Err(FrameError::NameTypeCountMismatch {
                types: types.len(),
                names: self.names.len(),
            });
        }
        if let Some((index, &column_type)) =
            types.iter().enumerate().find(|(_, t)| !t.is_concrete())
        {
            return Err(FrameError::InvalidColumnType { index, column_type });
        }
        self.types = types;
        Ok(())
    }

    fn set_skip_columns(&mut self, columns: &[usize]) -> Result<()> {
        if columns.is_empty() {
            return Err(FrameError::NoSkipColumnsGiven);
        }
        if !self.skip_columns.is_empty() {
            return Err(FrameError::SkipColumnsAlreadySet);
        }
        let mut skip = BTreeSet::new();
        for (position, &index) in columns.iter().enumerate() {
            if !skip.insert(index) {
                return Err(FrameError::DuplicateSkipColumn { position, index });
            }
        }
        self.skip_columns = skip;
        Ok(())
    }

    #[must_use]
    pub fn has_header(&self) -> bool {
        self.has_header
    }

    #[must_use]
    pub fn skips_blank_lines(&self) -> bool {
        self.skip_blank_lines
    }

    #[must_use]
    pub fn is_permissive(&self) -> bool {
        self.permissive
    }

    #[must_use]
    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    #[must_use]
    pub fn column_types(&self) -> &[ColumnType] {
        &self.types
    }

    #[must_use]
    pub fn skip_lines(&self) -> usize {
        self.skip_lines
    }

    /// Data rows sampled for type inference; 0 when the types are given.
    #[must_use]
    pub fn sample_lines(&self) -> usize {
        self.sample_lines
    }

    #[must_use]
    pub fn skip_columns(&self) -> Vec<usize> {
        self.skip_columns.iter().copied().collect()
    }

    #[must_use]
    pub fn max_errors(&self) -> usize {
        self.max_errors
    }

    /// The split pattern as written.
    #[must_use]
    pub fn split_pattern(&self) -> &str {
        self.split.as_str()
    }

    /// The comment pattern as written, if any.
    #[must_use]
    pub fn comment_pattern(&self) -> Option<&str> {
        self.comment.as_ref().map(Regex::as_str)
    }

    /// Read a table from `source`. `label` names the source in error
    /// messages, e.g. `file: data.txt:3: unexpected blank line`.
    ///
    /// # Errors
    /// I/O failures, and any input error when the reader is not permissive.
    pub fn read<R: BufRead>(&self, source: R, label: &str) -> anyhow::Result<Table> {
        self.read_with_stats(source, label).map(|(table, _)| table)
    }

    /// Like [`read`](Self::read), also returning what happened to each line.
    ///
    /// Bytes that are not valid UTF-8 are replaced with U+FFFD.
    ///
    /// # Errors
    /// As for [`read`](Self::read).
    pub fn read_with_stats<R: BufRead>(
        &self,
        source: R,
        label: &str,
    ) -> anyhow::Result<(Table, ReadStats)> {
        let lines = LossyLines::new(source)
            .enumerate()
            .map(|(idx, line)| line.with_context(|| format!("read line {} in {label}", idx + 1)));
        self.run(lines, label)
    }

    /// Read a table from lines already in memory.
    ///
    /// # Errors
    /// Any input error when the reader is not permissive.
    pub fn read_lines<I, S>(&self, lines: I, label: &str) -> anyhow::Result<Table>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.run(lines.into_iter().map(|l| Ok(l.into())), label)
            .map(|(table, _)| table)
    }

    /// Read a table from a string.
    ///
    /// # Errors
    /// Any input error when the reader is not permissive.
    pub fn read_str(&self, text: &str, label: &str) -> anyhow::Result<Table> {
        self.read(Cursor::new(text), label)
    }

    /// Read a table from a file, decompressing it first when its name or
    /// content shows it is compressed. Errors are labelled `file: <path>`.
    ///
    /// # Errors
    /// Failure to open or decode the file, and any input error when the
    /// reader is not permissive.
    pub fn read_file(&self, path: impl AsRef<Path>) -> anyhow::Result<Table> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
        let source = auto_detect_reader(file, path)?;
        self.read(source, &format!("file: {}", path.display()))
    }

    fn new_table(&self) -> Result<Table> {
        let mut table = Table::with_max_errors(self.max_errors);
        if !self.names.is_empty() {
            table.set_column_names(&self.names)?;
        }
        if !self.types.is_empty() {
            table.set_column_types(&self.types)?;
        }
        Ok(table)
    }

    fn run<I>(&self, lines: I, label: &str) -> anyhow::Result<(Table, ReadStats)>
    where
        I: Iterator<Item = anyhow::Result<String>>,
    {
        let mut table = self.new_table()?;
        let mut state = ReadState::new(self, label);

        'lines: for line in lines {
            state.next_line(line?);
            for stage in &PIPELINE {
                match (stage.run)(self, &mut state, &mut table)? {
                    Flow::Continue => {}
                    Flow::Skip => {
                        trace!("{}: stopped at {}", state.location, stage.name);
                        continue 'lines;
                    }
                }
            }
        }

        if let Err(err) = flush_sample(&mut state, &mut table) {
            if !self.permissive {
                return Err(err.into());
            }
            warn!("{err}");
        }

        state.stats.rows_ingested = table.row_count() as u64;
        state.stats.errors_recorded = table.error_count();
        info!("{label}: {}", state.stats);
        Ok((table, state.stats))
    }
}

fn compile(pattern: &str, purpose: &'static str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| FrameError::InvalidPattern {
        purpose,
        detail: e.to_string(),
    })
}

/// Fluent construction of a [`TableReader`]. Options are applied in the
/// order the methods are called.
#[derive(Debug, Clone, Default)]
pub struct ReaderBuilder {
    options: Vec<ReaderOption>,
}

impl ReaderBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add any option.
    #[must_use]
    pub fn option(mut self, option: ReaderOption) -> Self {
        self.options.push(option);
        self
    }

    #[must_use]
    pub fn has_header(self) -> Self {
        self.option(ReaderOption::HasHeader)
    }

    #[must_use]
    pub fn skip_blank_lines(self) -> Self {
        self.option(ReaderOption::SkipBlankLines)
    }

    #[must_use]
    pub fn permissive(self) -> Self {
        self.option(ReaderOption::Permissive)
    }

    #[must_use]
    pub fn column_names<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.option(ReaderOption::ColumnNames(
            names.into_iter().map(Into::into).collect(),
        ))
    }

    #[must_use]
    pub fn column_types(self, types: impl Into<Vec<ColumnType>>) -> Self {
        self.option(ReaderOption::ColumnTypes(types.into()))
    }

    #[must_use]
    pub fn comment_pattern(self, pattern: impl Into<String>) -> Self {
        self.option(ReaderOption::CommentPattern(pattern.into()))
    }

    #[must_use]
    pub fn split_pattern(self, pattern: impl Into<String>) -> Self {
        self.option(ReaderOption::SplitPattern(pattern.into()))
    }

    #[must_use]
    pub fn skip_lines(self, n: usize) -> Self {
        self.option(ReaderOption::SkipLines(n))
    }

    #[must_use]
    pub fn sample_lines(self, n: usize) -> Self {
        self.option(ReaderOption::SampleLines(n))
    }

    #[must_use]
    pub fn skip_columns(self, columns: impl Into<Vec<usize>>) -> Self {
        self.option(ReaderOption::SkipColumns(columns.into()))
    }

    #[must_use]
    pub fn max_errors(self, n: usize) -> Self {
        self.option(ReaderOption::MaxErrors(n))
    }

    /// Apply the recorded options.
    ///
    /// # Errors
    /// As for [`TableReader::new`].
    pub fn build(self) -> Result<TableReader> {
        TableReader::new(self.options)
    }
}
