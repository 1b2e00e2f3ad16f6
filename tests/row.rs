//! Tests for rows built by hand and rows taken from tables.

use ironframe::testing::assert_layout;
use ironframe::{
    BoolVal, ColumnInfo, ColumnType, FloatVal, FrameError, IntVal, Row, TextVal, Value,
};

fn sample_row() -> anyhow::Result<Row> {
    let mut row = Row::default();
    row.add_text("city", TextVal::new("Oslo"))?;
    row.add_int("population", IntVal::new(709_000))?;
    row.add_float("latitude", FloatVal::new(59.91))?;
    row.add_bool("capital", BoolVal::new(true))?;
    row.add_int("founded", IntVal::new(1040))?;
    Ok(row)
}

#[test]
fn new_row_is_all_unavailable() -> anyhow::Result<()> {
    let row = Row::new([
        ColumnInfo::new("a", ColumnType::Int)?,
        ColumnInfo::new("b", ColumnType::Text)?,
    ])?;
    assert_eq!(row.column_count(), 2);
    assert!(row.value_at(0)?.is_unavailable());
    assert!(row.get::<TextVal>("b")?.unavailable);
    Ok(())
}

#[test]
fn new_row_rejects_duplicate_names() -> anyhow::Result<()> {
    let err = Row::new([
        ColumnInfo::new("a", ColumnType::Int)?,
        ColumnInfo::new("a", ColumnType::Bool)?,
    ])
    .unwrap_err();
    assert!(matches!(err, FrameError::ColumnRejected { index: 1, .. }));
    Ok(())
}

#[test]
fn push_extends_registry_and_values() -> anyhow::Result<()> {
    let row = sample_row()?;
    assert_eq!(row.column_count(), 5);
    assert_eq!(row.registry().slot_of(4), Some(1));
    assert_eq!(row.get::<IntVal>("founded")?.get(), Some(1040));
    assert_eq!(row.get_at::<IntVal>(1)?.get(), Some(709_000));
    assert_eq!(
        row.value_by_name("city")?,
        Value::Text(TextVal::new("Oslo"))
    );
    Ok(())
}

#[test]
fn push_rejects_a_used_name_and_leaves_the_row_alone() -> anyhow::Result<()> {
    let mut row = sample_row()?;
    let err = row.push("city", IntVal::new(1)).unwrap_err();
    assert_eq!(
        err.to_string(),
        "duplicate column name: \"city\" is used for columns 0 and 5"
    );
    assert_eq!(row.column_count(), 5);
    assert_eq!(row.get::<IntVal>("founded")?.get(), Some(1040));
    Ok(())
}

#[test]
fn typed_access_checks_the_type() -> anyhow::Result<()> {
    let row = sample_row()?;
    let err = row.get::<BoolVal>("city").unwrap_err();
    assert_eq!(
        err.to_string(),
        "the column named \"city\" is of type text not bool"
    );
    let err = row.get_at::<TextVal>(2).unwrap_err();
    assert_eq!(
        err.to_string(),
        "the column with index 2 is of type float not text"
    );
    assert_eq!(
        row.value_at(7).unwrap_err(),
        FrameError::IndexOutOfRange { index: 7, count: 5 }
    );
    assert_eq!(
        row.get::<IntVal>("nope").unwrap_err(),
        FrameError::UnknownColumn("nope".to_string())
    );
    Ok(())
}

#[test]
fn set_overwrites_one_value() -> anyhow::Result<()> {
    let mut row = sample_row()?;
    row.set("population", IntVal::new(717_710))?;
    assert_eq!(row.get::<IntVal>("population")?.get(), Some(717_710));
    assert_eq!(row.get::<IntVal>("founded")?.get(), Some(1040));

    assert!(row.set("population", TextVal::new("many")).is_err());
    Ok(())
}

#[test]
fn to_empty_table_accepts_the_row() -> anyhow::Result<()> {
    let row = sample_row()?;
    let mut table = row.to_empty_table();
    assert_layout(
        &table,
        &[
            ("city", ColumnType::Text),
            ("population", ColumnType::Int),
            ("latitude", ColumnType::Float),
            ("capital", ColumnType::Bool),
            ("founded", ColumnType::Int),
        ],
    );
    assert_eq!(table.row_count(), 0);

    table.add_row(&row)?;
    table.add_row(&row)?;
    assert_eq!(table.row_count(), 2);
    assert_eq!(table.row_at(1), row);
    Ok(())
}

#[test]
fn project_row_to_columns() -> anyhow::Result<()> {
    let row = sample_row()?;

    let columns = row.columns_by_name(&["founded", "city"])?;
    assert_eq!(columns.len(), 2);
    assert_eq!(columns[0].name(), "founded");
    assert_eq!(columns[0].values::<IntVal>()?, [IntVal::new(1040)]);
    assert_eq!(columns[1].get(0)?.to_string(), "Oslo");

    let columns = row.columns_by_index(&[3])?;
    assert_eq!(columns[0].column_type(), ColumnType::Bool);
    assert_eq!(columns[0].row_count(), 1);

    assert!(row.columns_by_index(&[0, 9]).is_err());
    assert!(row.columns_by_name(&["city", "country"]).is_err());
    Ok(())
}

#[test]
fn value_wrappers_parse_text() {
    let mut v = IntVal::default();
    assert!(v.set_text("0o17").is_ok());
    assert_eq!(v.get(), Some(15));

    let err = v.set_text("99999999999999999999").unwrap_err();
    assert_eq!(err.reason, "value out of range");
    assert!(v.unavailable);

    let mut b = BoolVal::default();
    assert!(b.set_text("True").is_ok());
    assert_eq!(b.get(), Some(true));
    assert!(b.set_text("yes").is_err());
    assert_eq!(b.get(), None);

    let mut f = FloatVal::default();
    assert!(f.set_text("1_000.5").is_ok());
    assert_eq!(f.get(), Some(1000.5));
    assert!(f.set_text("1e999").is_err());
}
