use std::fs;

use chrono::NaiveDate;
use fh_core::errors::HubError;
use fh_core::{Column, Table, HUBVERSE_QUANTILE_LEVELS};
use fh_hubverse::{assemble, validate_submission, SubmissionMetadata, SubmissionTable};
use fh_loc::{LocationFormat, LocationRegistry};
use fh_quant::{project, TrajectorySet};
use ndarray::Array3;

fn submission() -> SubmissionTable {
    let registry = LocationRegistry::global().expect("registry");
    let draws = Array3::from_shape_fn((40, 2, 2), |(draw, loc, time)| {
        (draw + 10 * loc + 3 * time) as f64
    });
    let trajectories = TrajectorySet::new(
        draws,
        vec!["NY".to_string(), "DC".to_string()],
        LocationFormat::Abbr,
    )
    .expect("trajectories");
    let quantiles = project(&trajectories, &HUBVERSE_QUANTILE_LEVELS).expect("project");
    let reference = NaiveDate::from_ymd_opt(2024, 12, 7).expect("date");
    let metadata =
        SubmissionMetadata::weekly(reference, "wk inc covid hosp", &[-1, 0], 0).expect("metadata");
    assemble(&quantiles, &metadata, "covid", registry).expect("assemble")
}

#[test]
fn assembled_submissions_validate() {
    let registry = LocationRegistry::global().expect("registry");
    let submission = submission();
    assert_eq!(submission.len(), 2 * 2 * 23);
    let table = submission.to_table().expect("table");
    validate_submission(&table, "covid", registry).expect("valid");
}

#[test]
fn csv_output_round_trips_through_validation() {
    let registry = LocationRegistry::global().expect("registry");
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("2024-12-07-team-model.csv");
    submission().write_csv_path(&path).expect("write");

    let text = fs::read_to_string(&path).expect("read");
    assert_eq!(
        text.lines().next(),
        Some("reference_date,target,horizon,target_end_date,location,output_type,output_type_id,value")
    );
    let second = text.lines().nth(1).expect("row");
    assert!(second.starts_with("2024-12-07,wk inc covid hosp,-1,2024-11-30,36,quantile,0.01,"));

    let table = Table::from_csv_path(&path).expect("read table");
    validate_submission(&table, "COVID", registry).expect("valid");
}

#[test]
fn json_output_has_one_record_per_row() {
    let bytes = submission().to_json_bytes().expect("json");
    let records: Vec<serde_json::Value> = serde_json::from_slice(&bytes).expect("parse");
    assert_eq!(records.len(), 92);
    assert_eq!(records[0]["location"], "36");
    assert_eq!(records[0]["reference_date"], "2024-12-07");
    assert_eq!(records[0]["output_type_id"], "0.01");
}

#[test]
fn validation_catches_broken_submissions() {
    let registry = LocationRegistry::global().expect("registry");
    let table = submission().to_table().expect("table");
    let height = table.height();

    let reordered = table
        .select(&[
            "target",
            "reference_date",
            "horizon",
            "target_end_date",
            "location",
            "output_type",
            "output_type_id",
            "value",
        ])
        .expect("select");
    let err = validate_submission(&reordered, "covid", registry).unwrap_err();
    assert_eq!(err.code(), "submission.columns");

    let outside = table
        .with_column(Column::text("location", vec!["78"; height]))
        .expect("column");
    let err = validate_submission(&outside, "covid", registry).unwrap_err();
    assert!(matches!(err, HubError::InvalidLocation(_)));
    assert_eq!(err.info().context["offending"], "[78]");

    let padded = table
        .with_column(Column::text("output_type_id", vec!["0.50"; height]))
        .expect("column");
    assert!(matches!(
        validate_submission(&padded, "covid", registry),
        Err(HubError::InvalidQuantileLevels(_))
    ));

    let far = table
        .with_column(Column::int("horizon", vec![5; height]))
        .expect("column");
    assert_eq!(
        validate_submission(&far, "covid", registry).unwrap_err().code(),
        "submission.horizon"
    );

    let mut values = vec![1.0; height];
    values[3] = f64::INFINITY;
    let infinite = table
        .with_column(Column::float("value", values))
        .expect("column");
    let err = validate_submission(&infinite, "covid", registry).unwrap_err();
    assert_eq!(err.code(), "submission.value");
    assert_eq!(err.info().context["row"], "3");

    let empty = table.filter(&vec![false; height]).expect("filter");
    assert!(matches!(
        validate_submission(&empty, "covid", registry),
        Err(HubError::EmptyInput(_))
    ));
}
