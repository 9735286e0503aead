use std::collections::BTreeSet;

use fh_core::errors::{ErrorInfo, HubError};
use fh_core::validate::{require_column, require_rows, require_text_column};
use fh_core::{Column, ColumnData, Table};
use fh_loc::LocationFormat;
use serde::{Deserialize, Serialize};

/// Column names of a quantile table, in output order.
pub const QUANTILE_TABLE_COLUMNS: [&str; 4] = ["location", "time_index", "quantile_level", "value"];

/// Quantile of one (location, time point) cell at one level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantileRow {
    /// Location label, in the table's location format.
    pub location: String,
    /// Index of the time point on the trajectory time axis.
    pub time_index: usize,
    /// Probability level of the quantile.
    pub quantile_level: f64,
    /// Quantile value.
    pub value: f64,
}

/// Long table of projected quantiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantileTable {
    /// Representation of the `location` values.
    pub location_format: LocationFormat,
    /// Rows ordered by location, time point, then level.
    pub rows: Vec<QuantileRow>,
}

impl QuantileTable {
    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true when the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct time indices present in the table.
    pub fn time_indices(&self) -> BTreeSet<usize> {
        self.rows.iter().map(|row| row.time_index).collect()
    }

    /// Values of one cell in row order.
    pub fn cell_values(&self, location: &str, time_index: usize) -> Vec<f64> {
        self.rows
            .iter()
            .filter(|row| row.location == location && row.time_index == time_index)
            .map(|row| row.value)
            .collect()
    }

    /// Converts to a [`Table`] with columns `location, time_index, quantile_level, value`.
    pub fn to_table(&self) -> Result<Table, HubError> {
        Table::new(vec![
            Column::text("location", self.rows.iter().map(|row| row.location.clone())),
            Column::int(
                "time_index",
                self.rows.iter().map(|row| row.time_index as i64).collect(),
            ),
            Column::float(
                "quantile_level",
                self.rows.iter().map(|row| row.quantile_level).collect(),
            ),
            Column::float("value", self.rows.iter().map(|row| row.value).collect()),
        ])
    }

    /// Reads a quantile table from any [`Table`] holding the four quantile
    /// columns, in any column order. Text columns (as read from CSV) are
    /// parsed.
    pub fn from_table(table: &Table, location_format: LocationFormat) -> Result<Self, HubError> {
        require_rows(table, "quantile")?;
        let locations = require_text_column(table, "location")?;
        let time_indices = numeric_column(table, "time_index")?;
        let levels = numeric_column(table, "quantile_level")?;
        let values = numeric_column(table, "value")?;
        let mut rows = Vec::with_capacity(table.height());
        for idx in 0..table.height() {
            let time = time_indices[idx];
            if time < 0.0 || time.fract() != 0.0 || !time.is_finite() {
                return Err(HubError::TypeMismatch(
                    ErrorInfo::new(
                        "quantile.time_index",
                        format!("time_index {time} is not a non-negative integer"),
                    )
                    .with_context("row", idx.to_string()),
                ));
            }
            rows.push(QuantileRow {
                location: locations[idx].clone(),
                time_index: time as usize,
                quantile_level: levels[idx],
                value: values[idx],
            });
        }
        Ok(Self {
            location_format,
            rows,
        })
    }
}

fn numeric_column(table: &Table, name: &str) -> Result<Vec<f64>, HubError> {
    match require_column(table, name)?.data() {
        ColumnData::Float(values) => Ok(values.clone()),
        ColumnData::Int(values) => Ok(values.iter().map(|value| *value as f64).collect()),
        ColumnData::Text(values) => values
            .iter()
            .enumerate()
            .map(|(idx, value)| {
                value.trim().parse::<f64>().map_err(|_| {
                    HubError::TypeMismatch(
                        ErrorInfo::new(
                            "quantile.parse",
                            format!("column '{name}' row {idx}: '{value}' is not a number"),
                        )
                        .with_context("column", name)
                        .with_context("value", value.as_str()),
                    )
                })
            })
            .collect(),
        ColumnData::Bool(_) => Err(HubError::TypeMismatch(
            ErrorInfo::new("quantile.column_type", format!("column '{name}' holds booleans"))
                .with_context("column", name),
        )),
    }
}
