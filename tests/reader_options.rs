//! Tests for reader configuration: options, the builder and JSON configs.

use ironframe::{ColumnType, FrameError, ReaderBuilder, ReaderConfig, ReaderOption, TableReader};

fn names(list: &[&str]) -> ReaderOption {
    ReaderOption::ColumnNames(list.iter().map(ToString::to_string).collect())
}

fn config_err(options: Vec<ReaderOption>) -> FrameError {
    TableReader::new(options).expect_err("configuration should fail")
}

#[test]
fn defaults() -> anyhow::Result<()> {
    let reader = TableReader::new(Vec::new())?;
    assert!(!reader.has_header());
    assert!(!reader.skips_blank_lines());
    assert!(!reader.is_permissive());
    assert_eq!(reader.sample_lines(), 10);
    assert_eq!(reader.skip_lines(), 0);
    assert_eq!(reader.split_pattern(), r"\s+");
    assert_eq!(reader.comment_pattern(), None);
    assert_eq!(reader.max_errors(), 500);
    Ok(())
}

#[test]
fn header_and_names_conflict_in_either_order() {
    assert_eq!(
        config_err(vec![ReaderOption::HasHeader, names(&["a", "b"])]),
        FrameError::HasNamesAndHeader
    );
    assert_eq!(
        config_err(vec![names(&["a", "b"]), ReaderOption::HasHeader]),
        FrameError::HasNamesAndHeader
    );
}

#[test]
fn names_must_be_given_once_and_unique() {
    assert_eq!(config_err(vec![names(&[])]), FrameError::NoNamesGiven);
    assert_eq!(
        config_err(vec![names(&["c1", "c2"]), names(&["C1", "C2"])]),
        FrameError::NamesAlreadySet
    );
    assert_eq!(
        config_err(vec![names(&["A", "B", "C", "A"])]).to_string(),
        "duplicate column name: \"A\" is used for columns 0 and 3"
    );
}

#[test]
fn types_must_be_given_once_and_concrete() {
    use ColumnType::{Int, Unknown};

    assert_eq!(
        config_err(vec![ReaderOption::ColumnTypes(vec![])]),
        FrameError::NoTypesGiven
    );
    assert_eq!(
        config_err(vec![
            ReaderOption::ColumnTypes(vec![Int; 4]),
            ReaderOption::ColumnTypes(vec![Int; 4]),
        ]),
        FrameError::TypesAlreadySet
    );
    assert_eq!(
        config_err(vec![ReaderOption::ColumnTypes(vec![Unknown])]).to_string(),
        "bad column type: column: 0 type: unknown"
    );
}

#[test]
fn names_and_types_must_agree_in_count() {
    let expected = "the number of column types (3) and names (4) differ";
    let types = ReaderOption::ColumnTypes(vec![ColumnType::Int; 3]);
    let four = names(&["c1", "c2", "c3", "c4"]);

    assert_eq!(
        config_err(vec![four.clone(), types.clone()]).to_string(),
        expected
    );
    assert_eq!(config_err(vec![types, four]).to_string(), expected);
}

#[test]
fn bad_patterns_fail_at_configuration() {
    let err = config_err(vec![ReaderOption::CommentPattern("*".into())]);
    assert!(
        err.to_string().starts_with("the regexp to strip comments is invalid"),
        "{err}"
    );

    let err = config_err(vec![ReaderOption::SplitPattern("(".into())]);
    assert!(
        err.to_string().starts_with("the pattern for splitting lines is invalid"),
        "{err}"
    );
}

#[test]
fn some_type_information_is_required() {
    assert_eq!(
        config_err(vec![ReaderOption::SampleLines(0)]).to_string(),
        "either give column types explicitly or give some lines to work it out"
    );
}

#[test]
fn explicit_types_turn_off_sampling() -> anyhow::Result<()> {
    let reader = TableReader::new(vec![
        ReaderOption::SampleLines(0),
        ReaderOption::ColumnTypes(vec![ColumnType::Float]),
    ])?;
    assert_eq!(reader.sample_lines(), 0);

    let reader = TableReader::new(vec![
        ReaderOption::ColumnTypes(vec![ColumnType::Float]),
        ReaderOption::SampleLines(25),
    ])?;
    assert_eq!(reader.sample_lines(), 0);
    Ok(())
}

#[test]
fn skip_columns_validation() {
    assert_eq!(
        config_err(vec![ReaderOption::SkipColumns(vec![])]),
        FrameError::NoSkipColumnsGiven
    );
    assert_eq!(
        config_err(vec![
            ReaderOption::SkipColumns(vec![0]),
            ReaderOption::SkipColumns(vec![0]),
        ]),
        FrameError::SkipColumnsAlreadySet
    );
    assert_eq!(
        config_err(vec![ReaderOption::SkipColumns(vec![3, 1, 3])]),
        FrameError::DuplicateSkipColumn {
            position: 2,
            index: 3
        }
    );
}

#[test]
fn builder_applies_options_in_order() -> anyhow::Result<()> {
    let reader = ReaderBuilder::new()
        .skip_blank_lines()
        .permissive()
        .comment_pattern("#.*")
        .split_pattern(";")
        .skip_lines(3)
        .sample_lines(4)
        .skip_columns([5, 1])
        .max_errors(7)
        .build()?;
    assert!(reader.skips_blank_lines());
    assert!(reader.is_permissive());
    assert_eq!(reader.comment_pattern(), Some("#.*"));
    assert_eq!(reader.split_pattern(), ";");
    assert_eq!(reader.skip_lines(), 3);
    assert_eq!(reader.sample_lines(), 4);
    assert_eq!(reader.skip_columns(), [1, 5]);
    assert_eq!(reader.max_errors(), 7);

    let err = ReaderBuilder::new()
        .column_names(["a"])
        .has_header()
        .build()
        .unwrap_err();
    assert_eq!(err, FrameError::HasNamesAndHeader);
    Ok(())
}

#[test]
fn max_errors_caps_the_table_log() -> anyhow::Result<()> {
    let reader = ReaderBuilder::new()
        .column_types([ColumnType::Int])
        .permissive()
        .max_errors(2)
        .build()?;
    let table = reader.read_str("a\nb\nc\n1", "capped")?;
    assert_eq!(table.row_count(), 4);
    assert_eq!(table.error_count(), 3);
    assert_eq!(table.errors().len(), 2);
    Ok(())
}

#[test]
fn config_from_json() -> anyhow::Result<()> {
    let config = ReaderConfig::from_json_str(
        r#"{
            "has_header": true,
            "skip_blank_lines": true,
            "column_types": ["int", "text"],
            "comment_pattern": "\\s*#.*$",
            "max_errors": 12
        }"#,
    )?;
    assert_eq!(config.column_types, Some(vec![ColumnType::Int, ColumnType::Text]));

    let options = config.clone().into_options();
    assert_eq!(options[0], ReaderOption::HasHeader);
    assert_eq!(options.len(), 5);

    let reader = config.build()?;
    assert!(reader.has_header());
    assert_eq!(reader.column_types(), [ColumnType::Int, ColumnType::Text]);

    let table = reader.read_str("n word # header\n\n1 one\n2 two # trailing\n", "json")?;
    assert_eq!(table.row_count(), 2);
    assert_eq!(table.registry().names(), ["n", "word"]);
    Ok(())
}

#[test]
fn config_rejects_unknown_fields() {
    let err = ReaderConfig::from_json_str(r#"{ "headers": true }"#).unwrap_err();
    assert!(err.to_string().contains("parse reader config"));
}

#[test]
fn config_round_trips_through_json() -> anyhow::Result<()> {
    let config = ReaderConfig {
        permissive: true,
        split_pattern: Some(",".into()),
        skip_columns: Some(vec![0, 2]),
        ..ReaderConfig::default()
    };
    let json = serde_json::to_string(&config)?;
    assert!(!json.contains("column_names"));
    assert_eq!(ReaderConfig::from_json_str(&json)?, config);
    Ok(())
}
