#![deny(missing_docs)]
#![doc = "Projection of forecast trajectory ensembles onto per-cell quantiles."]

/// Empirical quantile computation.
pub mod project;
/// Long-format quantile tables.
pub mod table;
/// Draw ensembles indexed by (draw, location, time point).
pub mod trajectory;

pub use project::{cell_quantiles, project};
pub use table::{QuantileRow, QuantileTable, QUANTILE_TABLE_COLUMNS};
pub use trajectory::TrajectorySet;
