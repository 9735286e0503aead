use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use fh_core::errors::{ErrorInfo, HubError};
use fh_core::STANDARD_HORIZONS;
use serde::{Deserialize, Serialize};

/// Submission metadata for one time point of the trajectory axis.
///
/// Fields are optional so that incomplete metadata can be represented and
/// rejected when a submission is assembled.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimePointMeta {
    /// Saturday that anchors the submission round.
    #[serde(default)]
    pub reference_date: Option<NaiveDate>,
    /// Hubverse target name, e.g. `"wk inc flu hosp"`.
    #[serde(default)]
    pub target: Option<String>,
    /// Weeks between the reference date and the target week.
    #[serde(default)]
    pub horizon: Option<i64>,
    /// Last day of the target week.
    #[serde(default)]
    pub target_end_date: Option<NaiveDate>,
}

/// Fully specified metadata, as attached to submission rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ResolvedMeta {
    pub reference_date: NaiveDate,
    pub target: String,
    pub horizon: i64,
    pub target_end_date: NaiveDate,
}

/// Metadata keyed by time index.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SubmissionMetadata {
    /// Entries keyed by time index on the trajectory axis.
    pub time_points: BTreeMap<usize, TimePointMeta>,
}

impl SubmissionMetadata {
    /// Weekly metadata: time index `first_time_index + i` carries
    /// `horizons[i]` and ends `7 * horizon` days after `reference_date`.
    pub fn weekly(
        reference_date: NaiveDate,
        target: &str,
        horizons: &[i64],
        first_time_index: usize,
    ) -> Result<Self, HubError> {
        let mut time_points = BTreeMap::new();
        for (offset, &horizon) in horizons.iter().enumerate() {
            let target_end_date = horizon
                .checked_mul(7)
                .and_then(Duration::try_days)
                .and_then(|delta| reference_date.checked_add_signed(delta))
                .ok_or_else(|| {
                    HubError::SchemaViolation(
                        ErrorInfo::new(
                            "metadata.date_range",
                            format!("horizon {horizon} overflows the calendar"),
                        )
                        .with_context("horizon", horizon.to_string()),
                    )
                })?;
            time_points.insert(
                first_time_index + offset,
                TimePointMeta {
                    reference_date: Some(reference_date),
                    target: Some(target.to_string()),
                    horizon: Some(horizon),
                    target_end_date: Some(target_end_date),
                },
            );
        }
        Ok(Self { time_points })
    }

    /// Adds or replaces the entry for `time_index`.
    pub fn insert(&mut self, time_index: usize, meta: TimePointMeta) {
        self.time_points.insert(time_index, meta);
    }

    pub(crate) fn resolve(&self, time_index: usize) -> Result<ResolvedMeta, HubError> {
        let meta = self
            .time_points
            .get(&time_index)
            .ok_or_else(|| missing_field(time_index, "all"))?;
        let horizon = meta
            .horizon
            .ok_or_else(|| missing_field(time_index, "horizon"))?;
        if !STANDARD_HORIZONS.contains(&horizon) {
            return Err(HubError::SchemaViolation(
                ErrorInfo::new(
                    "metadata.horizon",
                    format!("horizon {horizon} at time index {time_index} is not a standard horizon"),
                )
                .with_context("time_index", time_index.to_string())
                .with_context("horizon", horizon.to_string())
                .with_list("expected", STANDARD_HORIZONS.iter().map(i64::to_string)),
            ));
        }
        Ok(ResolvedMeta {
            reference_date: meta
                .reference_date
                .ok_or_else(|| missing_field(time_index, "reference_date"))?,
            target: meta
                .target
                .clone()
                .filter(|target| !target.is_empty())
                .ok_or_else(|| missing_field(time_index, "target"))?,
            horizon,
            target_end_date: meta
                .target_end_date
                .ok_or_else(|| missing_field(time_index, "target_end_date"))?,
        })
    }
}

fn missing_field(time_index: usize, field: &str) -> HubError {
    HubError::SchemaViolation(
        ErrorInfo::new(
            "metadata.missing",
            format!("metadata field '{field}' missing for time index {time_index}"),
        )
        .with_context("time_index", time_index.to_string())
        .with_context("field", field),
    )
}
