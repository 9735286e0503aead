use fh_core::errors::HubError;
use fh_core::validate::require_increasing_levels;
use rayon::prelude::*;

use crate::table::{QuantileRow, QuantileTable};
use crate::trajectory::TrajectorySet;

/// Empirical quantiles of every (location, time point) cell.
///
/// Each cell's draws are sorted and interpolated linearly at rank
/// `level * (n - 1)`. Output is non-decreasing in level within a cell.
/// Cells holding NaN yield NaN at every level; infinite draws are carried
/// through the interpolation unchanged.
pub fn project(trajectories: &TrajectorySet, levels: &[f64]) -> Result<QuantileTable, HubError> {
    require_increasing_levels(levels)?;
    let n_times = trajectories.n_time_points();
    let cells: Vec<(usize, usize)> = (0..trajectories.n_locations())
        .flat_map(|loc| (0..n_times).map(move |time| (loc, time)))
        .collect();
    let quantiles: Vec<Vec<f64>> = cells
        .par_iter()
        .map(|&(loc, time)| cell_quantiles(trajectories.cell(loc, time).to_vec(), levels))
        .collect();

    let mut rows = Vec::with_capacity(cells.len() * levels.len());
    let mut non_finite = 0usize;
    for (&(loc, time), values) in cells.iter().zip(quantiles) {
        let location = &trajectories.locations()[loc];
        if values.iter().any(|value| !value.is_finite()) {
            non_finite += 1;
            tracing::warn!(
                location = %location,
                time_index = time,
                "non-finite draws; quantiles left non-finite"
            );
        }
        rows.extend(
            levels
                .iter()
                .zip(values)
                .map(|(&quantile_level, value)| QuantileRow {
                    location: location.clone(),
                    time_index: time,
                    quantile_level,
                    value,
                }),
        );
    }
    tracing::debug!(
        draws = trajectories.n_draws(),
        cells = cells.len(),
        levels = levels.len(),
        non_finite,
        "projected trajectories to quantiles"
    );
    Ok(QuantileTable {
        location_format: trajectories.location_format(),
        rows,
    })
}

/// Quantiles of a single sample at increasing `levels`.
///
/// `sample` must be non-empty.
pub fn cell_quantiles(mut sample: Vec<f64>, levels: &[f64]) -> Vec<f64> {
    if sample.is_empty() || sample.iter().any(|value| value.is_nan()) {
        return vec![f64::NAN; levels.len()];
    }
    sample.sort_by(f64::total_cmp);
    let last = sample.len() - 1;
    let mut floor = f64::NEG_INFINITY;
    levels
        .iter()
        .map(|&level| {
            let value = interpolate(&sample, level * last as f64);
            // Rounding in the interpolation may dip below the previous level.
            if value.is_nan() {
                return value;
            }
            let clamped = value.max(floor);
            floor = clamped;
            clamped
        })
        .collect()
}

fn interpolate(sorted: &[f64], position: f64) -> f64 {
    let last = sorted.len() - 1;
    let lower = (position.floor() as usize).min(last);
    let upper = (position.ceil() as usize).min(last);
    if lower == upper || sorted[lower] == sorted[upper] {
        return sorted[lower];
    }
    let weight = position - lower as f64;
    sorted[lower] * (1.0 - weight) + sorted[upper] * weight
}
