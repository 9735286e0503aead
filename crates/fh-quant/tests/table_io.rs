use fh_core::errors::HubError;
use fh_core::{Column, Table};
use fh_loc::LocationFormat;
use fh_quant::{project, QuantileTable, TrajectorySet, QUANTILE_TABLE_COLUMNS};

const LONG_CSV: &str = "draw,location,time_index,value
0,MA,0,1.0
0,MA,1,2.0
0,CA,0,3.0
0,CA,1,4.0
1,MA,0,5.0
1,MA,1,6.0
1,CA,0,7.0
1,CA,1,NaN
";

#[test]
fn long_csv_builds_an_ensemble() {
    let set = TrajectorySet::read_csv(LONG_CSV.as_bytes(), LocationFormat::Abbr).expect("read");
    assert_eq!(set.n_draws(), 2);
    assert_eq!(set.locations(), ["MA", "CA"]);
    assert_eq!(set.n_time_points(), 2);
    assert_eq!(set.cell(1, 0).to_vec(), vec![3.0, 7.0]);
    assert!(set.cell(1, 1)[1].is_nan());
}

#[test]
fn incomplete_or_duplicated_csv_is_rejected() {
    let missing = "draw,location,time_index,value\n0,MA,0,1\n1,MA,1,2\n";
    assert!(matches!(
        TrajectorySet::read_csv(missing.as_bytes(), LocationFormat::Abbr),
        Err(HubError::SchemaViolation(_))
    ));
    let duplicated = "draw,location,time_index,value\n0,MA,0,1\n0,MA,0,2\n";
    let err = TrajectorySet::read_csv(duplicated.as_bytes(), LocationFormat::Abbr).unwrap_err();
    assert_eq!(err.code(), "trajectory.duplicate_draw");
    let garbage = "draw,location,time_index,value\nx,MA,0,1\n";
    assert!(matches!(
        TrajectorySet::read_csv(garbage.as_bytes(), LocationFormat::Abbr),
        Err(HubError::Serde(_))
    ));
}

#[test]
fn quantile_table_survives_csv_with_shuffled_columns() {
    let set = TrajectorySet::read_csv(LONG_CSV.as_bytes(), LocationFormat::Abbr).expect("read");
    let projected = project(&set, &[0.25, 0.75]).expect("project");
    let table = projected.to_table().expect("table");
    assert_eq!(table.column_names(), QUANTILE_TABLE_COLUMNS);
    let shuffled = table
        .select(&["value", "quantile_level", "location", "time_index"])
        .expect("select");
    let mut bytes = Vec::new();
    shuffled.write_csv(&mut bytes).expect("write");
    let reread = Table::from_csv_reader(bytes.as_slice()).expect("read");
    let restored = QuantileTable::from_table(&reread, LocationFormat::Abbr).expect("restore");
    assert_eq!(restored.len(), projected.len());
    for (a, b) in restored.rows.iter().zip(projected.rows.iter()) {
        assert_eq!(a.location, b.location);
        assert_eq!(a.time_index, b.time_index);
        assert_eq!(a.quantile_level, b.quantile_level);
        assert!(a.value == b.value || (a.value.is_nan() && b.value.is_nan()));
    }
}

#[test]
fn from_table_reports_bad_numbers() {
    let table = Table::new(vec![
        Column::text("location", ["MA"]),
        Column::text("time_index", ["0"]),
        Column::text("quantile_level", ["half"]),
        Column::text("value", ["1.0"]),
    ])
    .expect("table");
    let err = QuantileTable::from_table(&table, LocationFormat::Abbr).unwrap_err();
    assert!(matches!(err, HubError::TypeMismatch(_)));
    assert_eq!(err.info().context["column"], "quantile_level");

    let negative = table
        .with_column(Column::text("quantile_level", ["0.5"]))
        .and_then(|t| t.with_column(Column::int("time_index", vec![-1])))
        .expect("table");
    assert!(QuantileTable::from_table(&negative, LocationFormat::Abbr).is_err());
}

#[test]
fn oversized_indices_are_rejected_not_wrapped() {
    let max_draw = format!("draw,location,time_index,value\n0,US,0,1.0\n{},US,0,1.0\n", usize::MAX);
    let err = TrajectorySet::read_csv(max_draw.as_bytes(), LocationFormat::Hubverse).unwrap_err();
    assert!(matches!(err, HubError::SchemaViolation(_)));
    assert_eq!(err.code(), "trajectory.index_overflow");
    assert_eq!(err.info().context["row"], "2");
    assert_eq!(err.info().context["column"], "draw");

    let max_time = format!("draw,location,time_index,value\n0,US,{},1.0\n", usize::MAX);
    let err = TrajectorySet::read_csv(max_time.as_bytes(), LocationFormat::Hubverse).unwrap_err();
    assert_eq!(err.info().context["column"], "time_index");

    let huge = usize::MAX / 2;
    let sparse = format!("draw,location,time_index,value\n{huge},US,{huge},1.0\n");
    let err = TrajectorySet::read_csv(sparse.as_bytes(), LocationFormat::Hubverse).unwrap_err();
    assert_eq!(err.code(), "trajectory.shape_overflow");
}
