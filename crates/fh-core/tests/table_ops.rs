use fh_core::errors::HubError;
use fh_core::{Column, ColumnData, Table};

fn sample() -> Table {
    Table::new(vec![
        Column::text("location", ["US", "01", "99"]),
        Column::int("horizon", vec![0, 1, 2]),
        Column::float("value", vec![10.0, 20.5, 30.25]),
    ])
    .expect("table")
}

#[test]
fn ragged_columns_are_rejected() {
    let err = Table::new(vec![
        Column::text("location", ["US"]),
        Column::int("horizon", vec![0, 1]),
    ])
    .unwrap_err();
    assert!(matches!(err, HubError::SchemaViolation(_)));
    assert_eq!(err.info().context["column"], "horizon");
}

#[test]
fn duplicate_columns_are_rejected() {
    let err = Table::new(vec![Column::text("a", ["x"]), Column::text("a", ["y"])]).unwrap_err();
    assert_eq!(err.code(), "table.duplicate_column");
}

#[test]
fn filter_and_take_leave_receiver_untouched() {
    let table = sample();
    let filtered = table.filter(&[true, false, true]).expect("filter");
    assert_eq!(filtered.height(), 2);
    assert_eq!(table.height(), 3);
    assert_eq!(
        filtered.column("location").map(Column::data),
        Some(&ColumnData::Text(vec!["US".into(), "99".into()]))
    );
    let repeated = table.take(&[1, 1]);
    assert_eq!(repeated.render_row(0), repeated.render_row(1));
}

#[test]
fn with_column_replaces_in_place() {
    let table = sample();
    let replaced = table
        .with_column(Column::text("location", ["AA", "BB", "CC"]))
        .expect("replace");
    assert_eq!(replaced.column_names(), table.column_names());
    assert_eq!(replaced.render_row(0)[0], "AA");
    assert_eq!(table.render_row(0)[0], "US");
}

#[test]
fn select_reorders_and_reports_missing() {
    let table = sample();
    let selected = table.select(&["value", "location"]).expect("select");
    assert_eq!(selected.column_names(), vec!["value", "location"]);
    let err = table.select(&["target"]).unwrap_err();
    assert!(matches!(err, HubError::MissingColumn(_)));
    assert_eq!(err.info().context["available"], "[location, horizon, value]");
}

#[test]
fn csv_round_trip_keeps_text() {
    let table = sample();
    let mut bytes = Vec::new();
    table.write_csv(&mut bytes).expect("write");
    let text = String::from_utf8(bytes.clone()).expect("utf8");
    assert!(text.starts_with("location,horizon,value\nUS,0,10\n"));
    let read = Table::from_csv_reader(bytes.as_slice()).expect("read");
    assert_eq!(read.column_names(), table.column_names());
    assert_eq!(read.render_row(1), vec!["01", "1", "20.5"]);
}
