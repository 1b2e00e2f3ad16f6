//! The per-line stage chain.
//!
//! Every input line runs through [`PIPELINE`] in order. A stage either lets
//! the line carry on, stops it ([`Flow::Skip`]), or fails the read. Failures
//! that the reader tolerates in permissive mode are recorded on the table and
//! turned into a skip instead.

use super::TableReader;
use super::infer::infer_column_types;
use super::location::Location;
use super::stats::ReadStats;
use crate::column::ColumnInfo;
use crate::error::FrameError;
use crate::table::Table;
use log::{debug, trace, warn};

/// What the driver should do with the current line after a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    Skip,
}

type StageFn = fn(&TableReader, &mut ReadState, &mut Table) -> Result<Flow, FrameError>;

/// A named step of the chain.
pub(crate) struct Stage {
    pub name: &'static str,
    pub run: StageFn,
}

pub(crate) const PIPELINE: [Stage; 8] = [
    Stage {
        name: "skip_lines",
        run: skip_lines,
    },
    Stage {
        name: "strip_comments",
        run: strip_comments,
    },
    Stage {
        name: "blank_line",
        run: blank_line,
    },
    Stage {
        name: "split_line",
        run: split_line,
    },
    Stage {
        name: "first_data_line",
        run: first_data_line,
    },
    Stage {
        name: "check_arity",
        run: check_arity,
    },
    Stage {
        name: "buffer_sample",
        run: buffer_sample,
    },
    Stage {
        name: "ingest",
        run: ingest,
    },
];

/// Mutable state carried from line to line during one read.
#[derive(Debug)]
pub(crate) struct ReadState {
    pub location: Location,
    /// Lines that reached the first-data-line stage, header included.
    pub data_lines: u64,
    pub line: String,
    pub fields: Vec<String>,
    /// Rows held back for type inference; `None` once flushed.
    pub sample: Option<Vec<Vec<String>>>,
    pub stats: ReadStats,
}

impl ReadState {
    pub fn new(reader: &TableReader, source: &str) -> Self {
        Self {
            location: Location::new(source),
            data_lines: 0,
            line: String::new(),
            fields: Vec::new(),
            sample: (reader.sample_lines > 0).then(|| Vec::with_capacity(reader.sample_lines)),
            stats: ReadStats::default(),
        }
    }

    /// Make `line` the current one.
    pub fn next_line(&mut self, line: String) {
        self.location.advance();
        self.stats.lines_read += 1;
        self.line = line;
        self.fields.clear();
    }
}

/// Record `err` and skip the line when permissive, otherwise fail.
fn reject(
    reader: &TableReader,
    state: &mut ReadState,
    table: &mut Table,
    err: FrameError,
) -> Result<Flow, FrameError> {
    state.stats.lines_rejected += 1;
    table.record_error(err.clone());
    if reader.permissive {
        warn!("{err}");
        Ok(Flow::Skip)
    } else {
        Err(err)
    }
}

fn skip_lines(reader: &TableReader, state: &mut ReadState, _: &mut Table) -> Result<Flow, FrameError> {
    if state.location.line() <= reader.skip_lines as u64 {
        trace!("{}: skipped", state.location);
        state.stats.lines_skipped += 1;
        return Ok(Flow::Skip);
    }
    Ok(Flow::Continue)
}

fn strip_comments(reader: &TableReader, state: &mut ReadState, _: &mut Table) -> Result<Flow, FrameError> {
    if let Some(start) = reader
        .comment
        .as_ref()
        .and_then(|re| re.find(&state.line))
        .map(|m| m.start())
    {
        state.line.truncate(start);
    }
    Ok(Flow::Continue)
}

fn blank_line(reader: &TableReader, state: &mut ReadState, table: &mut Table) -> Result<Flow, FrameError> {
    if !state.line.is_empty() {
        return Ok(Flow::Continue);
    }
    if reader.skip_blank_lines {
        trace!("{}: blank line ignored", state.location);
        state.stats.blank_lines += 1;
        return Ok(Flow::Skip);
    }
    let err = FrameError::UnexpectedBlankLine {
        location: state.location.to_string(),
    };
    reject(reader, state, table, err)
}

fn split_line(reader: &TableReader, state: &mut ReadState, table: &mut Table) -> Result<Flow, FrameError> {
    state.fields = reader
        .split
        .split(&state.line)
        .map(str::to_string)
        .collect();
    if reader.skip_columns.is_empty() {
        return Ok(Flow::Continue);
    }

    let width = state.fields.len();
    for &index in reader.skip_columns.iter().rev() {
        if index < width {
            state.fields.remove(index);
        }
    }

    let past_end: Vec<String> = reader
        .skip_columns
        .range(width..)
        .map(ToString::to_string)
        .collect();
    if past_end.is_empty() {
        return Ok(Flow::Continue);
    }
    let err = FrameError::SkipColumnsPastEnd {
        location: state.location.to_string(),
        indexes: past_end.join(", "),
    };
    reject(reader, state, table, err)
}

/// Names the columns from the first line that gets this far.
fn first_data_line(
    reader: &TableReader,
    state: &mut ReadState,
    table: &mut Table,
) -> Result<Flow, FrameError> {
    state.data_lines += 1;
    if state.data_lines != 1 || !reader.names.is_empty() {
        return Ok(Flow::Continue);
    }

    let (named, flow) = if reader.has_header {
        state.stats.lines_skipped += 1;
        debug!("{}: column names taken from the header", state.location);
        (table.set_column_names(&state.fields), Flow::Skip)
    } else {
        let names: Vec<String> = (0..state.fields.len()).map(|i| format!("V{i}")).collect();
        (table.set_column_names(&names), Flow::Continue)
    };

    match named {
        Ok(()) => Ok(flow),
        Err(err) if reader.permissive => {
            warn!("{}: {err}", state.location);
            Ok(flow)
        }
        Err(err) => Err(err),
    }
}

fn check_arity(reader: &TableReader, state: &mut ReadState, table: &mut Table) -> Result<Flow, FrameError> {
    let columns = table.column_count();
    if columns == state.fields.len() {
        return Ok(Flow::Continue);
    }
    let fields: String = state
        .fields
        .iter()
        .enumerate()
        .map(|(i, f)| format!(" col {i}: {f:?}"))
        .collect();
    let err = FrameError::LineArity {
        location: state.location.to_string(),
        columns,
        given: state.fields.len(),
        fields,
    };
    reject(reader, state, table, err)
}

fn buffer_sample(reader: &TableReader, state: &mut ReadState, table: &mut Table) -> Result<Flow, FrameError> {
    let Some(sample) = state.sample.as_mut() else {
        return Ok(Flow::Continue);
    };
    sample.push(std::mem::take(&mut state.fields));
    if sample.len() < reader.sample_lines {
        return Ok(Flow::Skip);
    }

    match flush_sample(state, table) {
        Err(err) if reader.permissive => warn!("{err}"),
        other => other?,
    }
    Ok(Flow::Skip)
}

fn ingest(reader: &TableReader, state: &mut ReadState, table: &mut Table) -> Result<Flow, FrameError> {
    let failures = table.add_row_from_text(&state.fields);
    if failures == 0 {
        return Ok(Flow::Continue);
    }
    if reader.permissive {
        warn!("{}: {failures} fields could not be parsed", state.location);
        return Ok(Flow::Continue);
    }
    Err(FrameError::ParseErrors {
        location: state.location.to_string(),
    })
}

/// Type any untyped columns from the buffered rows, then move those rows into
/// the table. Buffering is over once this has run.
pub(crate) fn flush_sample(state: &mut ReadState, table: &mut Table) -> Result<(), FrameError> {
    let Some(sample) = state.sample.take() else {
        return Ok(());
    };
    if sample.is_empty() {
        return Ok(());
    }

    if !table.registry().is_typed() {
        let pinned: Vec<_> = table.columns().iter().map(ColumnInfo::column_type).collect();
        let types = infer_column_types(&pinned, &sample);
        debug!(
            "{}: inferred column types {types:?} from {} rows",
            state.location.source(),
            sample.len()
        );
        table.set_column_types(&types)?;
    }

    let kept_before = table.errors().len();
    let count = table.add_rows_from_text(&sample) as u64;
    debug!("{}: flushed {} buffered rows", state.location.source(), sample.len());

    if count == 0 {
        return Ok(());
    }
    Err(FrameError::InitialLinesErrors {
        source_label: state.location.source().to_string(),
        count,
        first: table
            .errors()
            .get(kept_before)
            .map(ToString::to_string)
            .unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::{ReaderOption, TableReader};
    use crate::types::ColumnType;

    fn reader(options: Vec<ReaderOption>) -> TableReader {
        TableReader::new(options).expect("valid options")
    }

    fn state_for(reader: &TableReader, line: &str) -> ReadState {
        let mut state = ReadState::new(reader, "test");
        state.next_line(line.to_string());
        state
    }

    #[test]
    fn pipeline_order_is_fixed() {
        let names: Vec<_> = PIPELINE.iter().map(|s| s.name).collect();
        assert_eq!(
            names,
            [
                "skip_lines",
                "strip_comments",
                "blank_line",
                "split_line",
                "first_data_line",
                "check_arity",
                "buffer_sample",
                "ingest",
            ]
        );
    }

    #[test]
    fn skip_lines_counts_from_one() {
        let r = reader(vec![ReaderOption::SkipLines(2)]);
        let mut table = Table::new();
        let mut state = ReadState::new(&r, "test");
        let mut flows = Vec::new();
        for line in ["a", "b", "c"] {
            state.next_line(line.to_string());
            flows.push(skip_lines(&r, &mut state, &mut table).unwrap());
        }
        assert_eq!(flows, [Flow::Skip, Flow::Skip, Flow::Continue]);
        assert_eq!(state.stats.lines_skipped, 2);
    }

    #[test]
    fn strip_comments_truncates_at_first_match() {
        let r = reader(vec![ReaderOption::CommentPattern(r"\s*#.*$".into())]);
        let mut table = Table::new();
        let mut state = state_for(&r, "9 2 3 4    # comment # more");
        assert_eq!(strip_comments(&r, &mut state, &mut table).unwrap(), Flow::Continue);
        assert_eq!(state.line, "9 2 3 4");

        let mut whole = state_for(&r, "# only a comment");
        strip_comments(&r, &mut whole, &mut table).unwrap();
        assert_eq!(whole.line, "");
    }

    #[test]
    fn blank_line_is_an_error_unless_ignored() {
        let strict = reader(vec![]);
        let mut table = Table::new();
        let mut state = state_for(&strict, "");
        let err = blank_line(&strict, &mut state, &mut table).unwrap_err();
        assert!(err.to_string().contains("test:1: unexpected blank line"));
        assert_eq!(table.error_count(), 1);

        let lenient = reader(vec![ReaderOption::SkipBlankLines]);
        let mut table = Table::new();
        let mut state = state_for(&lenient, "");
        assert_eq!(blank_line(&lenient, &mut state, &mut table).unwrap(), Flow::Skip);
        assert_eq!(table.error_count(), 0);

        let permissive = reader(vec![ReaderOption::Permissive]);
        let mut table = Table::new();
        let mut state = state_for(&permissive, "");
        assert_eq!(blank_line(&permissive, &mut state, &mut table).unwrap(), Flow::Skip);
        assert_eq!(table.error_count(), 1);
    }

    #[test]
    fn whitespace_only_line_is_not_blank() {
        let r = reader(vec![]);
        let mut table = Table::new();
        let mut state = state_for(&r, "   ");
        assert_eq!(blank_line(&r, &mut state, &mut table).unwrap(), Flow::Continue);
    }

    #[test]
    fn split_line_removes_skip_columns() {
        let r = reader(vec![ReaderOption::SkipColumns(vec![2, 4, 5])]);
        let mut table = Table::new();
        let mut state = state_for(&r, "a b c d e f g");
        assert_eq!(split_line(&r, &mut state, &mut table).unwrap(), Flow::Continue);
        assert_eq!(state.fields, ["a", "b", "d", "g"]);
    }

    #[test]
    fn split_line_reports_skip_columns_past_the_end() {
        let r = reader(vec![ReaderOption::SkipColumns(vec![1, 5, 7])]);
        let mut table = Table::new();
        let mut state = state_for(&r, "a b c");
        let err = split_line(&r, &mut state, &mut table).unwrap_err();
        assert_eq!(
            err.to_string(),
            "test:1: some skip columns are after the end of the line: 5, 7"
        );
    }

    #[test]
    fn split_line_uses_custom_pattern() {
        let r = reader(vec![ReaderOption::SplitPattern(",".into())]);
        let mut table = Table::new();
        let mut state = state_for(&r, "9,2,,4");
        split_line(&r, &mut state, &mut table).unwrap();
        assert_eq!(state.fields, ["9", "2", "", "4"]);
    }

    #[test]
    fn first_data_line_synthesizes_names() {
        let r = reader(vec![]);
        let mut table = Table::new();
        let mut state = state_for(&r, "1 2 3");
        split_line(&r, &mut state, &mut table).unwrap();
        assert_eq!(first_data_line(&r, &mut state, &mut table).unwrap(), Flow::Continue);
        assert_eq!(table.registry().names(), ["V0", "V1", "V2"]);

        state.next_line("4 5 6".into());
        split_line(&r, &mut state, &mut table).unwrap();
        assert_eq!(first_data_line(&r, &mut state, &mut table).unwrap(), Flow::Continue);
        assert_eq!(state.data_lines, 2);
    }

    #[test]
    fn first_data_line_takes_header_and_skips_it() {
        let r = reader(vec![ReaderOption::HasHeader]);
        let mut table = Table::new();
        let mut state = state_for(&r, "a b");
        split_line(&r, &mut state, &mut table).unwrap();
        assert_eq!(first_data_line(&r, &mut state, &mut table).unwrap(), Flow::Skip);
        assert_eq!(table.registry().names(), ["a", "b"]);
    }

    #[test]
    fn check_arity_lists_every_field() {
        let r = reader(vec![]);
        let mut table = Table::new();
        table.set_column_names(&["a", "b"]).unwrap();
        let mut state = state_for(&r, "x");
        split_line(&r, &mut state, &mut table).unwrap();
        let err = check_arity(&r, &mut state, &mut table).unwrap_err();
        assert_eq!(
            err.to_string(),
            "test:1: the table has 2 columns but this line has 1:  col 0: \"x\""
        );
        assert_eq!(state.stats.lines_rejected, 1);
    }

    #[test]
    fn buffer_sample_holds_rows_until_full() {
        let r = reader(vec![ReaderOption::SampleLines(2)]);
        let mut table = Table::new();
        table.set_column_names(&["a"]).unwrap();
        let mut state = ReadState::new(&r, "test");

        state.next_line("7".into());
        state.fields = vec!["7".into()];
        assert_eq!(buffer_sample(&r, &mut state, &mut table).unwrap(), Flow::Skip);
        assert_eq!(table.row_count(), 0);

        state.next_line("8".into());
        state.fields = vec!["8".into()];
        assert_eq!(buffer_sample(&r, &mut state, &mut table).unwrap(), Flow::Skip);
        assert_eq!(table.row_count(), 2);
        assert!(state.sample.is_none());
        assert_eq!(table.columns()[0].column_type(), ColumnType::Int);

        state.next_line("9".into());
        state.fields = vec!["9".into()];
        assert_eq!(buffer_sample(&r, &mut state, &mut table).unwrap(), Flow::Continue);
    }

    #[test]
    fn flush_counts_only_errors_from_sampled_rows() {
        let r = reader(vec![ReaderOption::Permissive]);
        let mut table = Table::new();
        table.set_column_names(&["n"]).unwrap();
        table.record_error(FrameError::UnexpectedBlankLine {
            location: "test:1".into(),
        });
        let mut state = ReadState::new(&r, "test");
        state.sample = Some(vec![vec!["1".into()], vec!["2".into()]]);

        assert_eq!(flush_sample(&mut state, &mut table), Ok(()));
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.error_count(), 1);
    }

    #[test]
    fn flush_reports_the_first_sampled_row_error() {
        let r = reader(vec![ReaderOption::ColumnTypes(vec![ColumnType::Int])]);
        let mut table = Table::new();
        table.set_column_names(&["n"]).unwrap();
        table.set_column_types(&[ColumnType::Int]).unwrap();
        table.record_error(FrameError::TypesNotSet);
        let mut state = ReadState::new(&r, "test");
        state.sample = Some(vec![vec!["1".into()], vec!["x".into()]]);

        let err = flush_sample(&mut state, &mut table).unwrap_err();
        assert_eq!(
            err.to_string(),
            "test: 1 errors parsing initial lines (first error: data row: 1 column: 0: \
             cannot parse \"x\" as int: invalid syntax)"
        );
    }

    #[test]
    fn ingest_fails_on_parse_errors_unless_permissive() {
        let strict = reader(vec![ReaderOption::ColumnTypes(vec![ColumnType::Int])]);
        let mut table = Table::new();
        table.set_column_names(&["n"]).unwrap();
        table.set_column_types(&[ColumnType::Int]).unwrap();
        let mut state = state_for(&strict, "x");
        state.fields = vec!["x".into()];
        let err = ingest(&strict, &mut state, &mut table).unwrap_err();
        assert_eq!(err.to_string(), "test:1: parsing errors");

        let permissive = reader(vec![
            ReaderOption::ColumnTypes(vec![ColumnType::Int]),
            ReaderOption::Permissive,
        ]);
        let mut state = state_for(&permissive, "y");
        state.fields = vec!["y".into()];
        assert_eq!(ingest(&permissive, &mut state, &mut table).unwrap(), Flow::Continue);
        assert_eq!(table.row_count(), 2);
    }
}
