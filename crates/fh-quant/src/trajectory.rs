use std::collections::{BTreeMap, HashMap, HashSet};
use std::io::Read;

use fh_core::errors::{ErrorInfo, HubError};
use fh_loc::LocationFormat;
use ndarray::{s, Array3, ArrayD, ArrayView1, Ix3};
use serde::Deserialize;

fn schema_error(code: &str, message: impl Into<String>) -> HubError {
    HubError::SchemaViolation(ErrorInfo::new(code, message))
}

fn index_overflow(row: usize, column: &str) -> HubError {
    HubError::SchemaViolation(
        ErrorInfo::new(
            "trajectory.index_overflow",
            format!("row {}: {column} is too large", row + 1),
        )
        .with_context("row", (row + 1).to_string())
        .with_context("column", column),
    )
}

/// Ensemble of forecast draws indexed by (draw, location, time point).
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectorySet {
    draws: Array3<f64>,
    locations: Vec<String>,
    location_format: LocationFormat,
}

impl TrajectorySet {
    /// Wraps a rank-3 array whose second axis is labelled by `locations`.
    pub fn new(
        draws: Array3<f64>,
        locations: Vec<String>,
        location_format: LocationFormat,
    ) -> Result<Self, HubError> {
        let (n_draws, n_locations, _) = draws.dim();
        if n_draws == 0 {
            return Err(HubError::EmptyInput(ErrorInfo::new(
                "trajectory.no_draws",
                "the trajectory ensemble has no draws",
            )));
        }
        if locations.len() != n_locations {
            return Err(HubError::SchemaViolation(
                ErrorInfo::new(
                    "trajectory.location_labels",
                    format!(
                        "{} location labels for a location axis of length {n_locations}",
                        locations.len()
                    ),
                )
                .with_context("labels", locations.len().to_string())
                .with_context("axis", n_locations.to_string()),
            ));
        }
        let mut seen = HashSet::new();
        if let Some(repeat) = locations.iter().find(|label| !seen.insert(label.as_str())) {
            return Err(HubError::SchemaViolation(
                ErrorInfo::new(
                    "trajectory.duplicate_location",
                    format!("location '{repeat}' labels more than one slice"),
                )
                .with_context("location", repeat.as_str()),
            ));
        }
        Ok(Self {
            draws,
            locations,
            location_format,
        })
    }

    /// Accepts an array of any rank, rejecting anything but rank 3.
    pub fn from_dyn(
        draws: ArrayD<f64>,
        locations: Vec<String>,
        location_format: LocationFormat,
    ) -> Result<Self, HubError> {
        let rank = draws.ndim();
        let draws = draws.into_dimensionality::<Ix3>().map_err(|_| {
            HubError::TypeMismatch(
                ErrorInfo::new(
                    "trajectory.rank",
                    format!("expected a rank 3 (draw, location, time) array, got rank {rank}"),
                )
                .with_context("rank", rank.to_string()),
            )
        })?;
        Self::new(draws, locations, location_format)
    }

    /// Reads long-format CSV with columns `draw,location,time_index,value`.
    ///
    /// Locations keep their order of first appearance; every
    /// (draw, location, time_index) combination must appear exactly once.
    pub fn read_csv<R: Read>(reader: R, location_format: LocationFormat) -> Result<Self, HubError> {
        #[derive(Deserialize)]
        struct DrawRecord {
            draw: usize,
            location: String,
            time_index: usize,
            value: f64,
        }

        let mut rdr = csv::Reader::from_reader(reader);
        let mut locations: Vec<String> = Vec::new();
        let mut location_index: HashMap<String, usize> = HashMap::new();
        let mut cells: BTreeMap<(usize, usize, usize), f64> = BTreeMap::new();
        let mut n_draws = 0;
        let mut n_times = 0;
        for (row, record) in rdr.deserialize::<DrawRecord>().enumerate() {
            let record = record.map_err(|err| {
                HubError::Serde(
                    ErrorInfo::new("trajectory.csv_record", err.to_string())
                        .with_context("row", (row + 1).to_string()),
                )
            })?;
            let loc = *location_index
                .entry(record.location.clone())
                .or_insert_with(|| {
                    locations.push(record.location.clone());
                    locations.len() - 1
                });
            let draw_end = record
                .draw
                .checked_add(1)
                .ok_or_else(|| index_overflow(row, "draw"))?;
            let time_end = record
                .time_index
                .checked_add(1)
                .ok_or_else(|| index_overflow(row, "time_index"))?;
            n_draws = n_draws.max(draw_end);
            n_times = n_times.max(time_end);
            if cells
                .insert((record.draw, loc, record.time_index), record.value)
                .is_some()
            {
                return Err(HubError::SchemaViolation(
                    ErrorInfo::new(
                        "trajectory.duplicate_draw",
                        "the same draw, location and time index appears twice",
                    )
                    .with_context("draw", record.draw.to_string())
                    .with_context("location", record.location)
                    .with_context("time_index", record.time_index.to_string()),
                ));
            }
        }
        let expected = n_draws
            .checked_mul(locations.len())
            .and_then(|cells| cells.checked_mul(n_times))
            .ok_or_else(|| {
                HubError::SchemaViolation(
                    ErrorInfo::new(
                        "trajectory.shape_overflow",
                        format!(
                            "{n_draws} draws, {} locations and {n_times} time points exceed the addressable size",
                            locations.len()
                        ),
                    )
                    .with_context("draws", n_draws.to_string())
                    .with_context("time_points", n_times.to_string()),
                )
            })?;
        if cells.len() != expected {
            return Err(HubError::SchemaViolation(
                ErrorInfo::new(
                    "trajectory.incomplete",
                    format!(
                        "expected {expected} draw values for {n_draws} draws, {} locations and {n_times} time points, found {}",
                        locations.len(),
                        cells.len()
                    ),
                )
                .with_hint("every draw needs a value for every location and time index"),
            ));
        }
        let draws = Array3::from_shape_fn((n_draws, locations.len(), n_times), |key| cells[&key]);
        Self::new(draws, locations, location_format)
    }

    /// Restricts the time axis to `len` points starting at `start`.
    ///
    /// Time indices of the result restart at zero.
    pub fn time_window(&self, start: usize, len: usize) -> Result<Self, HubError> {
        let n_times = self.n_time_points();
        let end = start.checked_add(len).filter(|end| *end <= n_times).ok_or_else(|| {
            schema_error(
                "trajectory.time_window",
                format!("window {start}..{start}+{len} exceeds {n_times} time points"),
            )
        })?;
        Ok(Self {
            draws: self.draws.slice(s![.., .., start..end]).to_owned(),
            locations: self.locations.clone(),
            location_format: self.location_format,
        })
    }

    /// Raw draw array.
    pub fn draws(&self) -> &Array3<f64> {
        &self.draws
    }

    /// Location labels in axis order.
    pub fn locations(&self) -> &[String] {
        &self.locations
    }

    /// Representation of the location labels.
    pub fn location_format(&self) -> LocationFormat {
        self.location_format
    }

    /// Number of draws in the ensemble.
    pub fn n_draws(&self) -> usize {
        self.draws.dim().0
    }

    /// Number of locations.
    pub fn n_locations(&self) -> usize {
        self.draws.dim().1
    }

    /// Number of time points.
    pub fn n_time_points(&self) -> usize {
        self.draws.dim().2
    }

    /// Draws of a single (location, time point) cell.
    pub fn cell(&self, location: usize, time_index: usize) -> ArrayView1<'_, f64> {
        self.draws.slice(s![.., location, time_index])
    }
}
