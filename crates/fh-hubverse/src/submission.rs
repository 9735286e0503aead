use std::collections::{BTreeSet, HashSet};
use std::io::Write;
use std::path::Path;

use chrono::{Duration, NaiveDate};
use fh_core::errors::{ErrorInfo, HubError};
use fh_core::serde::to_canonical_json_bytes;
use fh_core::validate::require_rows;
use fh_core::{
    quantile_level_id, Column, Hub, Table, HUBVERSE_SUBMISSION_COLUMNS, OUTPUT_TYPE_QUANTILE,
    STANDARD_HORIZONS,
};
use fh_loc::LocationRegistry;
use serde::{Deserialize, Serialize};

/// One row of a hubverse quantile submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRow {
    /// Reference date of the submission round.
    pub reference_date: NaiveDate,
    /// Hubverse target name.
    pub target: String,
    /// Weeks ahead of the reference date.
    pub horizon: i64,
    /// Last day of the target week.
    pub target_end_date: NaiveDate,
    /// Hub location code.
    pub location: String,
    /// Always `"quantile"`.
    pub output_type: String,
    /// Canonical quantile level as a decimal string.
    pub output_type_id: String,
    /// Quantile value.
    pub value: f64,
}

/// Assembled submission for one hub.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionTable {
    /// Hub the rows were validated against.
    pub hub: Hub,
    /// Submission rows.
    pub rows: Vec<SubmissionRow>,
}

impl SubmissionTable {
    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true when the submission has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Converts to a [`Table`] whose columns are always in hubverse order.
    pub fn to_table(&self) -> Result<Table, HubError> {
        let rows = &self.rows;
        let table = Table::new(vec![
            Column::float("value", rows.iter().map(|row| row.value).collect()),
            Column::text("location", rows.iter().map(|row| row.location.clone())),
            Column::text("target", rows.iter().map(|row| row.target.clone())),
            Column::int("horizon", rows.iter().map(|row| row.horizon).collect()),
            Column::text(
                "reference_date",
                rows.iter().map(|row| row.reference_date.to_string()),
            ),
            Column::text(
                "target_end_date",
                rows.iter().map(|row| row.target_end_date.to_string()),
            ),
            Column::text("output_type", rows.iter().map(|row| row.output_type.clone())),
            Column::text(
                "output_type_id",
                rows.iter().map(|row| row.output_type_id.clone()),
            ),
        ])?;
        table.select(&HUBVERSE_SUBMISSION_COLUMNS)
    }

    /// Writes the submission as CSV in hubverse column order.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), HubError> {
        self.to_table()?.write_csv(writer)
    }

    /// Writes the submission as CSV to `path`.
    pub fn write_csv_path(&self, path: &Path) -> Result<(), HubError> {
        self.to_table()?.write_csv_path(path)
    }

    /// Serializes the rows as canonical JSON records.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, HubError> {
        to_canonical_json_bytes(&self.rows)
    }
}

/// Checks an existing submission table against the hubverse contract and
/// the named hub's location set.
///
/// Columns may hold typed values or text as read from CSV.
pub fn validate_submission(
    table: &Table,
    hub_name: &str,
    registry: &LocationRegistry,
) -> Result<(), HubError> {
    let hub: Hub = hub_name.parse()?;
    require_rows(table, "submission")?;
    let names = table.column_names();
    if names != HUBVERSE_SUBMISSION_COLUMNS {
        return Err(HubError::SchemaViolation(
            ErrorInfo::new(
                "submission.columns",
                "submission columns do not match the hubverse schema",
            )
            .with_list("expected", HUBVERSE_SUBMISSION_COLUMNS)
            .with_list("found", names),
        ));
    }
    let render = |name: &str, idx: usize| -> String {
        table
            .column(name)
            .map(|column| column.data().render(idx))
            .unwrap_or_default()
    };

    let members: HashSet<&str> = registry.hub_codes(hub).iter().map(String::as_str).collect();
    let mut outside = BTreeSet::new();
    for idx in 0..table.height() {
        let output_type = render("output_type", idx);
        if output_type != OUTPUT_TYPE_QUANTILE {
            return Err(row_error(
                "submission.output_type",
                idx,
                format!("output_type '{output_type}' is not '{OUTPUT_TYPE_QUANTILE}'"),
            ));
        }

        let type_id = render("output_type_id", idx);
        let canonical = type_id
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(quantile_level_id);
        if canonical.as_deref() != Some(type_id.as_str()) {
            return Err(HubError::InvalidQuantileLevels(
                ErrorInfo::new(
                    "submission.output_type_id",
                    format!("row {idx}: '{type_id}' is not a canonical quantile level"),
                )
                .with_context("row", idx.to_string())
                .with_context("output_type_id", type_id),
            ));
        }

        let horizon_text = render("horizon", idx);
        let horizon = horizon_text
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|horizon| STANDARD_HORIZONS.contains(horizon))
            .ok_or_else(|| {
                row_error(
                    "submission.horizon",
                    idx,
                    format!("horizon '{horizon_text}' is not a standard horizon"),
                )
            })?;

        let reference_date = parse_date(&render("reference_date", idx), "reference_date", idx)?;
        let target_end_date = parse_date(&render("target_end_date", idx), "target_end_date", idx)?;
        if reference_date.checked_add_signed(Duration::days(7 * horizon)) != Some(target_end_date) {
            return Err(row_error(
                "submission.target_end_date",
                idx,
                format!(
                    "target_end_date {target_end_date} is not {horizon} weeks after {reference_date}"
                ),
            ));
        }

        if render("target", idx).is_empty() {
            return Err(row_error("submission.target", idx, "target is empty".into()));
        }

        let value_text = render("value", idx);
        if !value_text
            .trim()
            .parse::<f64>()
            .map(f64::is_finite)
            .unwrap_or(false)
        {
            return Err(row_error(
                "submission.value",
                idx,
                format!("value '{value_text}' is not a finite number"),
            ));
        }

        let location = render("location", idx);
        if !members.contains(location.as_str()) {
            outside.insert(location);
        }
    }
    if !outside.is_empty() {
        return Err(HubError::InvalidLocation(
            ErrorInfo::new(
                "submission.location",
                format!("locations are not accepted by the {hub} hub"),
            )
            .with_context("hub", hub.as_str())
            .with_list("offending", outside),
        ));
    }
    Ok(())
}

fn row_error(code: &str, idx: usize, message: String) -> HubError {
    HubError::SchemaViolation(
        ErrorInfo::new(code, format!("row {idx}: {message}")).with_context("row", idx.to_string()),
    )
}

fn parse_date(value: &str, column: &str, idx: usize) -> Result<NaiveDate, HubError> {
    value.trim().parse::<NaiveDate>().map_err(|_| {
        HubError::SchemaViolation(
            ErrorInfo::new(
                "submission.date",
                format!("row {idx}: {column} '{value}' is not an ISO date"),
            )
            .with_context("row", idx.to_string())
            .with_context("column", column),
        )
    })
}
